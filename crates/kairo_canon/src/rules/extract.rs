//! Dynamic-to-static extraction folding.
//!
//! When the start/index operand of a dynamic extraction is defined by a
//! constant, the access is replaced with the static-offset form carrying the
//! literal. The IR has two constant-producing operation kinds that are not
//! unified at this layer, so each fold exists in two variants matching one
//! kind each; neither subsumes the other.

use crate::rewrite::{OpTemplate, Operand, Rewrite};
use kairo_ir::{Graph, OpId, OpKind, Type, TypeDb, ValueId};

/// Matches `dyn_extract_slice(target, start)` where `start` is a generic
/// integer constant.
pub(super) fn slice_int_const_start(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let start = int_const_literal(graph, *graph.op(op).operands.get(1)?)?;
    fold_slice(graph, types, op, start)
}

/// Matches `dyn_extract_slice(target, start)` where `start` is the
/// dialect's own constant with all bits known.
pub(super) fn slice_const_start(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let start = dialect_const_literal(graph, *graph.op(op).operands.get(1)?)?;
    fold_slice(graph, types, op, start)
}

/// Matches `dyn_extract_element(target, index)` where `index` is a generic
/// integer constant.
pub(super) fn element_int_const_index(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let index = int_const_literal(graph, *graph.op(op).operands.get(1)?)?;
    fold_element(graph, types, op, index)
}

/// Matches `dyn_extract_element(target, index)` where `index` is the
/// dialect's own constant with all bits known.
pub(super) fn element_const_index(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    let index = dialect_const_literal(graph, *graph.op(op).operands.get(1)?)?;
    fold_element(graph, types, op, index)
}

/// The literal behind a generic integer constant, if `value` is one.
fn int_const_literal(graph: &Graph, value: ValueId) -> Option<u64> {
    match &graph.op(graph.def_op(value)?).kind {
        OpKind::IntConst { value } => Some(*value),
        _ => None,
    }
}

/// The literal behind a dialect constant, if `value` is one and every bit
/// is a known two-state value.
fn dialect_const_literal(graph: &Graph, value: ValueId) -> Option<u64> {
    match &graph.op(graph.def_op(value)?).kind {
        OpKind::Const { value } => value.to_u64(),
        _ => None,
    }
}

/// Builds the static slice replacement, if the literal start keeps the
/// slice in bounds. An out-of-range start is left for the host verifier.
fn fold_slice(graph: &Graph, types: &TypeDb, op: OpId, start: u64) -> Option<Rewrite> {
    let target = *graph.op(op).operands.first()?;
    let result_ty = graph.result_type(op);
    let (target_extent, result_extent) =
        match (types.get(graph.value(target).ty), types.get(result_ty)) {
            (Type::Int { width: tw, .. }, Type::Int { width: rw, .. }) => (*tw, *rw),
            (Type::Array { size: ts, .. }, Type::Array { size: rs, .. }) => (*ts, *rs),
            _ => return None,
        };
    if start + u64::from(result_extent) > u64::from(target_extent) {
        return None;
    }
    let start = u32::try_from(start).ok()?;
    Some(Rewrite::Build(vec![OpTemplate {
        kind: OpKind::ExtractSlice { start },
        operands: vec![Operand::Existing(target)],
        ty: result_ty,
    }]))
}

/// Builds the static element replacement, if the literal index is in
/// bounds.
fn fold_element(graph: &Graph, types: &TypeDb, op: OpId, index: u64) -> Option<Rewrite> {
    let target = *graph.op(op).operands.first()?;
    let size = types.array_size(graph.value(target).ty)?;
    if index >= u64::from(size) {
        return None;
    }
    let index = u32::try_from(index).ok()?;
    Some(Rewrite::Build(vec![OpTemplate {
        kind: OpKind::ExtractElement { index },
        operands: vec![Operand::Existing(target)],
        ty: graph.result_type(op),
    }]))
}
