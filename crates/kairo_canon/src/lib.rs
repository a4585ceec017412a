//! Canonicalization for the Kairo IR dialect.
//!
//! A fixed set of local rewrite rules that simplify bitwise/logical
//! operations and fold dynamically-indexed extractions whose index is
//! already known at compile time. Each rule is a pure match-and-build
//! function over one operation and its immediate operand definitions; the
//! [`driver`] offers operations to their kind's rule list and applies the
//! first match until a fixed point is reached.
//!
//! Folding a dynamic access into a static one removes an indirection the
//! backend would otherwise have to preserve, and exposes further local
//! simplification downstream.

#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod rewrite;
pub mod rules;

pub use config::{CanonConfig, ConfigError};
pub use driver::{apply_rewrite, canonicalize, canonicalize_op, canonicalize_with_config};
pub use rewrite::{OpTemplate, Operand, Rewrite};
pub use rules::{rules_for, Rule};
