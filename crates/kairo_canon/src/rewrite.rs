//! Replacement descriptors produced by canonicalization rules.
//!
//! A rule never mutates the graph itself; it describes the replacement and
//! the driver materializes it. This keeps rules pure and lets any external
//! scheduler apply them.

use kairo_ir::{OpKind, TypeId, ValueId};

/// An operand of a not-yet-built operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operand {
    /// A value that already exists in the graph.
    Existing(ValueId),
    /// The result of a previously listed template in the same rewrite
    /// (by position).
    Built(usize),
}

/// A recipe for one new operation.
#[derive(Clone, PartialEq, Debug)]
pub struct OpTemplate {
    /// The kind of the operation to build.
    pub kind: OpKind,
    /// Its operands, either existing values or earlier templates' results.
    pub operands: Vec<Operand>,
    /// Its result type.
    pub ty: TypeId,
}

/// The replacement a rule proposes for a matched operation.
#[derive(Clone, PartialEq, Debug)]
pub enum Rewrite {
    /// Replace the operation's result with an existing value.
    ReplaceWith(ValueId),
    /// Build the listed operations in order; the last one's result replaces
    /// the matched operation's result.
    Build(Vec<OpTemplate>),
}
