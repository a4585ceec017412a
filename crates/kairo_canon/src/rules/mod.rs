//! The built-in canonicalization rules, grouped by operation kind.
//!
//! The rule set is fixed at design time, so dispatch is a match over the
//! closed [`OpKind`] set returning static rule lists — no registration, no
//! dynamic dispatch. Within a kind, rules are ordered; the driver applies
//! the first that matches. Every rule targets a disjoint operand-source
//! shape, so at most one fires per visit, and no rule can match its own
//! output.

mod cmp;
mod extract;
mod not;
mod xor;

use crate::rewrite::Rewrite;
use kairo_ir::{Graph, OpId, OpKind, TypeDb};

/// A single canonicalization rule: a name for configuration and reporting,
/// and a pure match-and-build function.
///
/// The function inspects one operation and, at most, the operations defining
/// its operands (single-hop, bounded cost). It returns `None` when the
/// pattern does not apply; it never errors and never mutates the graph.
pub struct Rule {
    /// Kebab-case rule name, unique across the rule set.
    pub name: &'static str,
    /// The match-and-build function.
    pub apply: fn(&Graph, &TypeDb, OpId) -> Option<Rewrite>,
}

static XOR_RULES: [Rule; 1] = [Rule {
    name: "xor-all-bits-set",
    apply: xor::all_bits_set,
}];

static NOT_RULES: [Rule; 2] = [
    Rule {
        name: "not-of-eq",
        apply: not::not_of_eq,
    },
    Rule {
        name: "not-of-neq",
        apply: not::not_of_neq,
    },
];

static EQ_RULES: [Rule; 1] = [Rule {
    name: "bool-eq-to-xor",
    apply: cmp::bool_eq_to_xor,
}];

static NEQ_RULES: [Rule; 1] = [Rule {
    name: "bool-neq-to-xor",
    apply: cmp::bool_neq_to_xor,
}];

static DYN_SLICE_RULES: [Rule; 2] = [
    Rule {
        name: "dyn-slice-int-const-start",
        apply: extract::slice_int_const_start,
    },
    Rule {
        name: "dyn-slice-const-start",
        apply: extract::slice_const_start,
    },
];

static DYN_ELEMENT_RULES: [Rule; 2] = [
    Rule {
        name: "dyn-element-int-const-index",
        apply: extract::element_int_const_index,
    },
    Rule {
        name: "dyn-element-const-index",
        apply: extract::element_const_index,
    },
];

/// Returns the ordered rule list for an operation kind.
///
/// Kinds with no applicable rules (constants, already-static extractions)
/// return an empty slice.
pub fn rules_for(kind: &OpKind) -> &'static [Rule] {
    match kind {
        OpKind::Xor => &XOR_RULES,
        OpKind::Not => &NOT_RULES,
        OpKind::Eq => &EQ_RULES,
        OpKind::Neq => &NEQ_RULES,
        OpKind::DynExtractSlice => &DYN_SLICE_RULES,
        OpKind::DynExtractElement => &DYN_ELEMENT_RULES,
        OpKind::Const { .. }
        | OpKind::IntConst { .. }
        | OpKind::ExtractSlice { .. }
        | OpKind::ExtractElement { .. } => &[],
    }
}
