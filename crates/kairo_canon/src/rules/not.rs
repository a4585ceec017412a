//! `not-of-eq` / `not-of-neq`: complement of a comparison is the inverse
//! comparison.

use crate::rewrite::{OpTemplate, Operand, Rewrite};
use kairo_ir::{Graph, OpId, OpKind, TypeDb};

/// Matches `not(eq(a, b))` and replaces it with `neq(a, b)`.
pub(super) fn not_of_eq(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    invert_comparison(graph, types, op, OpKind::Eq, OpKind::Neq)
}

/// Matches `not(neq(a, b))` and replaces it with `eq(a, b)`.
///
/// Mutual inverse of [`not_of_eq`]: the two rules target disjoint inner
/// kinds, so applying one can never re-enable the other on the same
/// operation chain.
pub(super) fn not_of_neq(graph: &Graph, types: &TypeDb, op: OpId) -> Option<Rewrite> {
    invert_comparison(graph, types, op, OpKind::Neq, OpKind::Eq)
}

fn invert_comparison(
    graph: &Graph,
    _types: &TypeDb,
    op: OpId,
    inner_kind: OpKind,
    replacement_kind: OpKind,
) -> Option<Rewrite> {
    let operand = *graph.op(op).operands.first()?;
    let def = graph.def_op(operand)?;
    let inner = graph.op(def);
    if inner.kind != inner_kind {
        return None;
    }
    Some(Rewrite::Build(vec![OpTemplate {
        kind: replacement_kind,
        operands: inner.operands.iter().copied().map(Operand::Existing).collect(),
        ty: graph.result_type(op),
    }]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairo_ir::ValueId;
    use kairo_source::Span;

    fn comparison_graph(kind: OpKind) -> (TypeDb, Graph, OpId, ValueId, ValueId) {
        let mut types = TypeDb::new();
        let mut graph = Graph::new();
        let i1 = types.int(1);
        let i8 = types.int(8);
        let a = graph.add_input(i8);
        let b = graph.add_input(i8);
        let cmp = graph.build_op(kind, vec![a, b], i1, Span::DUMMY);
        let not = graph.build_op(OpKind::Not, vec![graph.result(cmp)], i1, Span::DUMMY);
        (types, graph, not, a, b)
    }

    #[test]
    fn not_of_eq_becomes_neq() {
        let (types, graph, not, a, b) = comparison_graph(OpKind::Eq);
        let Rewrite::Build(templates) = not_of_eq(&graph, &types, not).unwrap() else {
            panic!("expected a build rewrite");
        };
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].kind, OpKind::Neq);
        assert_eq!(
            templates[0].operands,
            vec![Operand::Existing(a), Operand::Existing(b)]
        );
    }

    #[test]
    fn not_of_neq_becomes_eq() {
        let (types, graph, not, _, _) = comparison_graph(OpKind::Neq);
        let Rewrite::Build(templates) = not_of_neq(&graph, &types, not).unwrap() else {
            panic!("expected a build rewrite");
        };
        assert_eq!(templates[0].kind, OpKind::Eq);
    }

    #[test]
    fn rules_target_disjoint_shapes() {
        let (types, graph, not, _, _) = comparison_graph(OpKind::Eq);
        assert!(not_of_neq(&graph, &types, not).is_none());

        let (types, graph, not, _, _) = comparison_graph(OpKind::Neq);
        assert!(not_of_eq(&graph, &types, not).is_none());
    }

    #[test]
    fn ignores_not_of_plain_value() {
        let mut types = TypeDb::new();
        let mut graph = Graph::new();
        let i8 = types.int(8);
        let a = graph.add_input(i8);
        let not = graph.build_op(OpKind::Not, vec![a], i8, Span::DUMMY);
        assert!(not_of_eq(&graph, &types, not).is_none());
        assert!(not_of_neq(&graph, &types, not).is_none());
    }

    #[test]
    fn ignores_not_of_other_ops() {
        let mut types = TypeDb::new();
        let mut graph = Graph::new();
        let i8 = types.int(8);
        let a = graph.add_input(i8);
        let b = graph.add_input(i8);
        let xor = graph.build_op(OpKind::Xor, vec![a, b], i8, Span::DUMMY);
        let not = graph.build_op(OpKind::Not, vec![graph.result(xor)], i8, Span::DUMMY);
        assert!(not_of_eq(&graph, &types, not).is_none());
    }
}
