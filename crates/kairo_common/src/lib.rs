//! Shared foundational types used across the Kairo IR toolkit.
//!
//! This crate provides interned identifiers, 4-state logic values, packed
//! logic vectors used as constant payloads, and common result types.

#![warn(missing_docs)]

pub mod ident;
pub mod logic;
pub mod logic_vec;
pub mod result;

pub use ident::{Ident, Interner};
pub use logic::Logic;
pub use logic_vec::LogicVec;
pub use result::{InternalError, KairoResult};
