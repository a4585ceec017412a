//! Rewrite application and the worklist fixed-point driver.
//!
//! Rules only describe replacements; this module materializes them. The
//! obligations are those of the rewrite application contract: per visit, at
//! most one rule fires, the replacement is structurally valid, and users of
//! a replaced result are revisited because their operand identity changed.

use crate::config::CanonConfig;
use crate::rewrite::{OpTemplate, Operand, Rewrite};
use crate::rules::rules_for;
use kairo_ir::{Graph, OpId, TypeDb, ValueId};
use std::collections::VecDeque;

/// Applies a rewrite to the graph, replacing `op`.
///
/// Template operations are built in order, carrying the replaced
/// operation's span. All uses of the old result are rerouted to the
/// replacement value and the old operation is killed. Returns the
/// replacement value.
///
/// # Panics
///
/// Panics if a build rewrite lists no templates, or if a template refers to
/// a later template's result. Rules constructed by this crate never do
/// either.
pub fn apply_rewrite(graph: &mut Graph, op: OpId, rewrite: Rewrite) -> ValueId {
    let old_result = graph.result(op);
    let span = graph.op(op).span;
    let replacement = match rewrite {
        Rewrite::ReplaceWith(value) => value,
        Rewrite::Build(templates) => {
            let mut built: Vec<ValueId> = Vec::with_capacity(templates.len());
            for OpTemplate { kind, operands, ty } in templates {
                let operands = operands
                    .into_iter()
                    .map(|operand| match operand {
                        Operand::Existing(value) => value,
                        Operand::Built(index) => built[index],
                    })
                    .collect();
                let new_op = graph.build_op(kind, operands, ty, span);
                built.push(graph.result(new_op));
            }
            *built
                .last()
                .expect("a build rewrite must create at least one operation")
        }
    };
    graph.replace_all_uses(old_result, replacement);
    graph.kill(op);
    replacement
}

/// Offers one operation to its kind's rule list and applies the first match.
///
/// Returns the replacement value if a rule fired, `None` otherwise
/// (including for dead operations). Cost is bounded: rules inspect only the
/// operation and its immediate operand definitions.
pub fn canonicalize_op(graph: &mut Graph, types: &TypeDb, op: OpId) -> Option<ValueId> {
    canonicalize_op_filtered(graph, types, op, &CanonConfig::default())
}

fn canonicalize_op_filtered(
    graph: &mut Graph,
    types: &TypeDb,
    op: OpId,
    config: &CanonConfig,
) -> Option<ValueId> {
    if graph.is_dead(op) {
        return None;
    }
    let rules = rules_for(&graph.op(op).kind);
    for rule in rules {
        if config.is_disabled(rule.name) {
            continue;
        }
        if let Some(rewrite) = (rule.apply)(graph, types, op) {
            return Some(apply_rewrite(graph, op, rewrite));
        }
    }
    None
}

/// Runs the full rule set to a fixed point.
///
/// Returns the number of rewrites applied. Running again on the result
/// returns 0.
pub fn canonicalize(graph: &mut Graph, types: &TypeDb) -> usize {
    canonicalize_with_config(graph, types, &CanonConfig::default())
}

/// Runs the rule set to a fixed point, skipping rules disabled by `config`.
///
/// Worklist discipline: every live operation is visited once; when a
/// rewrite fires, the newly built operations and the users of the
/// replacement value are re-enqueued. Each rewrite removes the only
/// operation its rule matches and none re-matches its own output, so the
/// worklist drains.
pub fn canonicalize_with_config(graph: &mut Graph, types: &TypeDb, config: &CanonConfig) -> usize {
    let mut queue: VecDeque<OpId> = graph.live_ops().map(|(id, _)| id).collect();
    let mut rewrites = 0;
    while let Some(op) = queue.pop_front() {
        let before = graph.op_count();
        if let Some(replacement) = canonicalize_op_filtered(graph, types, op, config) {
            rewrites += 1;
            for raw in before..graph.op_count() {
                queue.push_back(OpId::from_raw(raw as u32));
            }
            queue.extend(graph.users(replacement));
        }
    }
    rewrites
}
