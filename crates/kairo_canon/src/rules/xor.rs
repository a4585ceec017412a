//! `xor-all-bits-set`: xor against an all-ones constant is complement.

use crate::rewrite::{OpTemplate, Operand, Rewrite};
use kairo_ir::{Graph, OpId, OpKind, Type, TypeDb, ValueId};

/// Matches `xor(x, C)` (either operand order) where `C` is a constant with
/// every bit set, and replaces it with `not(x)`.
///
/// The replacement is a NOT, never another XOR, so the rule cannot re-match
/// its own output.
pub(super) fn all_bits_set(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let operation = graph.op(op);
    let (a, b) = match operation.operands.as_slice() {
        [a, b] => (*a, *b),
        _ => return None,
    };
    let other = if is_all_ones(graph, types, b) {
        a
    } else if is_all_ones(graph, types, a) {
        b
    } else {
        return None;
    };
    Some(Rewrite::Build(vec![OpTemplate {
        kind: OpKind::Not,
        operands: vec![Operand::Existing(other)],
        ty: graph.result_type(op),
    }]))
}

/// Returns `true` if the value is a constant with every bit of its type set.
///
/// Both constant-producing operation kinds qualify. For the generic integer
/// constant the width comes from the value's type; widths above 64 bits are
/// conservatively not matched.
fn is_all_ones(graph: &Graph, types: &TypeDb, value: ValueId) -> bool {
    let Some(def) = graph.def_op(value) else {
        return false;
    };
    match &graph.op(def).kind {
        OpKind::Const { value } => value.is_all_one(),
        OpKind::IntConst { value: literal } => {
            let Type::Int { width, .. } = types.get(graph.value(value).ty) else {
                return false;
            };
            let width = *width;
            if width == 0 || width > 64 {
                return false;
            }
            let mask = if width == 64 {
                u64::MAX
            } else {
                (1u64 << width) - 1
            };
            literal & mask == mask
        }
        _ => false,
    }
}
