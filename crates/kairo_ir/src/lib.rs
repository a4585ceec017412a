//! KairoIR — structural types and operation graph for a hardware IR dialect.
//!
//! This crate defines the structurally-uniqued type registry ([`TypeDb`]),
//! the textual type codec ([`parse_type`]/[`print_type`]), and the operation
//! graph ([`Graph`]) that the canonicalization layer rewrites. Types are
//! interned: two requests for structurally equal types always yield the same
//! [`TypeId`], which underlies all equality checks in the rewrite rules.

#![warn(missing_docs)]

pub mod arena;
pub mod graph;
pub mod ids;
pub mod text;
pub mod types;

pub use arena::{Arena, ArenaId};
pub use graph::{Graph, OpKind, Operation, Value, ValueDef};
pub use ids::{OpId, TypeId, ValueId};
pub use text::{parse_type, print_type, write_type, ParseError};
pub use types::{FieldInfo, Signedness, Type, TypeDb, TypeError};
