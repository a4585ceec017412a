//! `bool-eq-to-xor` / `bool-neq-to-xor`: single-bit comparisons are xor
//! identities.

use crate::rewrite::{OpTemplate, Operand, Rewrite};
use kairo_ir::{Graph, OpId, OpKind, TypeDb, TypeId, ValueId};

/// Matches `eq(a, b)` on single-bit operands and replaces it with
/// `not(xor(a, b))`.
///
/// The inner operation of the replacement is a XOR, not a comparison, so
/// neither comparison rule can fire again on the output.
pub(super) fn bool_eq_to_xor(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let (a, b, i1) = single_bit_operands(graph, types, op)?;
    Some(Rewrite::Build(vec![
        xor_template(a, b, i1),
        OpTemplate {
            kind: OpKind::Not,
            operands: vec![Operand::Built(0)],
            ty: i1,
        },
    ]))
}

/// Matches `neq(a, b)` on single-bit operands and replaces it with
/// `xor(a, b)`.
pub(super) fn bool_neq_to_xor(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let (a, b, i1) = single_bit_operands(graph, types, op)?;
    Some(Rewrite::Build(vec![xor_template(a, b, i1)]))
}

/// Returns the two operands and their type when both are signless `i1`.
fn single_bit_operands(
    graph: &Graph,
    types: &TypeDb,
    op: OpId,
) -> Option<(ValueId, ValueId, TypeId)> {
    let (a, b) = match graph.op(op).operands.as_slice() {
        [a, b] => (*a, *b),
        _ => return None,
    };
    let ty = graph.value(a).ty;
    if !types.is_bool(ty) {
        return None;
    }
    Some((a, b, ty))
}

fn xor_template(a: ValueId, b: ValueId, ty: TypeId) -> OpTemplate {
    OpTemplate {
        kind: OpKind::Xor,
        operands: vec![Operand::Existing(a), Operand::Existing(b)],
        ty,
    }
}
