//! The operation graph that canonicalization rewrites.
//!
//! A [`Graph`] holds operations and the SSA values they define in
//! append-only arenas. Replaced operations are marked dead rather than
//! removed, keeping IDs stable; connectivity queries scan live operations.

use crate::arena::Arena;
use crate::ids::{OpId, TypeId, ValueId};
use crate::types::{Signedness, Type, TypeDb};
use kairo_common::{InternalError, KairoResult, LogicVec};
use kairo_source::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The closed set of operation kinds this dialect rewrites.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OpKind {
    /// The dialect's own constant, carrying a 4-state bit-vector payload.
    Const {
        /// The constant value; its width is the result width.
        value: LogicVec,
    },
    /// A generic integer constant originating from the host IR's core
    /// dialect. Not unified with [`Const`](OpKind::Const) at this layer.
    IntConst {
        /// The literal value.
        value: u64,
    },
    /// Bitwise exclusive or of two equally-typed operands.
    Xor,
    /// Bitwise complement of one operand.
    Not,
    /// Equality comparison; the result is `i1`.
    Eq,
    /// Inequality comparison; the result is `i1`.
    Neq,
    /// Slice extraction at a static start offset. Operand: the target.
    ExtractSlice {
        /// Offset of the first extracted bit or element.
        start: u32,
    },
    /// Slice extraction at a run-time start offset.
    /// Operands: target, start index.
    DynExtractSlice,
    /// Element extraction at a static index. Operand: the target array.
    ExtractElement {
        /// Index of the extracted element.
        index: u32,
    },
    /// Element extraction at a run-time index.
    /// Operands: target array, index.
    DynExtractElement,
}

/// An operation in the graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operation {
    /// What the operation does.
    pub kind: OpKind,
    /// The values the operation consumes, in order.
    pub operands: Vec<ValueId>,
    /// The single value the operation defines.
    pub result: ValueId,
    /// Source location, carried over to replacement operations.
    pub span: Span,
}

/// Where a value comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ValueDef {
    /// Defined by an operation's result.
    Op(OpId),
    /// A graph input (free value supplied by the surrounding IR).
    Input(u32),
}

/// An SSA value: a type plus its definition site.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Value {
    /// The value's type.
    pub ty: TypeId,
    /// The value's definition site.
    pub def: ValueDef,
}

/// An operation graph.
///
/// Operations and values live in append-only arenas; replaced operations
/// are marked dead. The graph deliberately has no use-lists — users are
/// found by scanning live operations, which keeps mutation trivially
/// consistent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Graph {
    ops: Arena<OpId, Operation>,
    values: Arena<ValueId, Value>,
    dead: HashSet<OpId>,
    inputs: u32,
}

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a graph input of the given type and returns its value.
    pub fn add_input(&mut self, ty: TypeId) -> ValueId {
        let index = self.inputs;
        self.inputs += 1;
        self.values.alloc(Value {
            ty,
            def: ValueDef::Input(index),
        })
    }

    /// Builds a new operation, allocating its result value.
    ///
    /// No structural validation happens here; see [`verify`](Self::verify).
    pub fn build_op(
        &mut self,
        kind: OpKind,
        operands: Vec<ValueId>,
        result_ty: TypeId,
        span: Span,
    ) -> OpId {
        let op_id = OpId::from_raw(self.ops.len() as u32);
        let result = self.values.alloc(Value {
            ty: result_ty,
            def: ValueDef::Op(op_id),
        });
        let allocated = self.ops.alloc(Operation {
            kind,
            operands,
            result,
            span,
        });
        debug_assert_eq!(op_id, allocated);
        op_id
    }

    /// Returns the operation with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn op(&self, id: OpId) -> &Operation {
        self.ops.get(id)
    }

    /// Returns the value with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn value(&self, id: ValueId) -> &Value {
        self.values.get(id)
    }

    /// Returns the result value of an operation.
    pub fn result(&self, id: OpId) -> ValueId {
        self.op(id).result
    }

    /// Returns the type of an operation's result.
    pub fn result_type(&self, id: OpId) -> TypeId {
        self.value(self.result(id)).ty
    }

    /// Returns the operation defining a value, if the value is a live
    /// operation result.
    ///
    /// Returns `None` for graph inputs and for results of dead operations —
    /// a rule that pattern-matches through `def_op` can never see a
    /// replaced operation.
    pub fn def_op(&self, value: ValueId) -> Option<OpId> {
        match self.value(value).def {
            ValueDef::Op(op) if !self.is_dead(op) => Some(op),
            _ => None,
        }
    }

    /// Returns the live operations that use the given value as an operand.
    ///
    /// Each user appears once even if it uses the value in several operand
    /// positions. Linear scan over live operations.
    pub fn users(&self, value: ValueId) -> Vec<OpId> {
        self.live_ops()
            .filter(|(_, op)| op.operands.contains(&value))
            .map(|(id, _)| id)
            .collect()
    }

    /// Replaces every use of `from` with `to` in live operations.
    ///
    /// Returns the number of operand slots rewritten.
    pub fn replace_all_uses(&mut self, from: ValueId, to: ValueId) -> usize {
        let mut replaced = 0;
        for raw in 0..self.ops.len() as u32 {
            let id = OpId::from_raw(raw);
            if self.dead.contains(&id) {
                continue;
            }
            for operand in &mut self.ops.get_mut(id).operands {
                if *operand == from {
                    *operand = to;
                    replaced += 1;
                }
            }
        }
        replaced
    }

    /// Marks an operation as dead.
    ///
    /// Its result stops being visible through [`def_op`](Self::def_op); the
    /// caller is responsible for rerouting any remaining uses first.
    pub fn kill(&mut self, id: OpId) {
        self.dead.insert(id);
    }

    /// Returns `true` if the operation has been killed.
    pub fn is_dead(&self, id: OpId) -> bool {
        self.dead.contains(&id)
    }

    /// Iterates over live operations in creation order.
    pub fn live_ops(&self) -> impl Iterator<Item = (OpId, &Operation)> {
        self.ops.iter().filter(|(id, _)| !self.dead.contains(id))
    }

    /// Returns the number of live operations.
    pub fn live_op_count(&self) -> usize {
        self.ops.len() - self.dead.len()
    }

    /// Returns the total number of operations ever created, dead included.
    ///
    /// Because the arena is append-only, recording this before a mutation
    /// and comparing after identifies exactly the newly built operations.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Checks structural well-formedness of every live operation.
    ///
    /// Verifies per-kind operand counts, result-type agreement, static
    /// extraction bounds, and that no live operation reads a value defined
    /// by a dead operation. Violations are internal errors: the graph can
    /// only get into such a state through a bug in whoever mutated it.
    pub fn verify(&self, types: &TypeDb) -> KairoResult<()> {
        for (id, op) in self.live_ops() {
            self.verify_op(id, op, types)?;
        }
        Ok(())
    }

    fn verify_op(&self, id: OpId, op: &Operation, types: &TypeDb) -> KairoResult<()> {
        let fail = |message: String| -> KairoResult<()> {
            Err(InternalError::new(format!("op {}: {message}", id.as_raw())))
        };

        for &operand in &op.operands {
            if let ValueDef::Op(def) = self.value(operand).def {
                if self.is_dead(def) {
                    return fail(format!(
                        "operand {} is defined by dead op {}",
                        operand.as_raw(),
                        def.as_raw()
                    ));
                }
            }
        }
        if self.value(op.result).def != ValueDef::Op(id) {
            return fail("result value does not point back to its op".to_string());
        }

        let operand_count = |expected: usize| -> KairoResult<()> {
            if op.operands.len() != expected {
                return Err(InternalError::new(format!(
                    "op {}: expected {expected} operands, found {}",
                    id.as_raw(),
                    op.operands.len()
                )));
            }
            Ok(())
        };
        let operand_ty = |index: usize| types.get(self.value(op.operands[index]).ty);
        let result_ty = self.result_type(id);

        match &op.kind {
            OpKind::Const { value } => {
                operand_count(0)?;
                match types.get(result_ty) {
                    Type::Int {
                        width,
                        signedness: Signedness::Signless,
                    } if *width == value.width() => Ok(()),
                    _ => fail(format!(
                        "constant of width {} has mismatched result type",
                        value.width()
                    )),
                }
            }
            OpKind::IntConst { .. } => {
                operand_count(0)?;
                match types.get(result_ty) {
                    Type::Int { .. } => Ok(()),
                    _ => fail("integer constant must have an integer result".to_string()),
                }
            }
            OpKind::Xor => {
                operand_count(2)?;
                let lhs = self.value(op.operands[0]).ty;
                let rhs = self.value(op.operands[1]).ty;
                if lhs != rhs || result_ty != lhs {
                    return fail("xor operands and result must share one type".to_string());
                }
                if !matches!(
                    types.get(lhs),
                    Type::Int {
                        signedness: Signedness::Signless,
                        ..
                    }
                ) {
                    return fail("xor operates on signless integers".to_string());
                }
                Ok(())
            }
            OpKind::Not => {
                operand_count(1)?;
                let ty = self.value(op.operands[0]).ty;
                if result_ty != ty {
                    return fail("not result must match its operand type".to_string());
                }
                if !matches!(
                    types.get(ty),
                    Type::Int {
                        signedness: Signedness::Signless,
                        ..
                    }
                ) {
                    return fail("not operates on signless integers".to_string());
                }
                Ok(())
            }
            OpKind::Eq | OpKind::Neq => {
                operand_count(2)?;
                let lhs = self.value(op.operands[0]).ty;
                let rhs = self.value(op.operands[1]).ty;
                if lhs != rhs {
                    return fail("comparison operands must share one type".to_string());
                }
                if !types.is_bool(result_ty) {
                    return fail("comparison result must be i1".to_string());
                }
                Ok(())
            }
            OpKind::ExtractSlice { start } => {
                operand_count(1)?;
                self.verify_slice(id, op.operands[0], result_ty, Some(u64::from(*start)), types)
            }
            OpKind::DynExtractSlice => {
                operand_count(2)?;
                if !matches!(operand_ty(1), Type::Int { .. }) {
                    return fail("dynamic slice start must be an integer".to_string());
                }
                self.verify_slice(id, op.operands[0], result_ty, None, types)
            }
            OpKind::ExtractElement { index } => {
                operand_count(1)?;
                self.verify_element(id, op.operands[0], result_ty, Some(u64::from(*index)), types)
            }
            OpKind::DynExtractElement => {
                operand_count(2)?;
                if !matches!(operand_ty(1), Type::Int { .. }) {
                    return fail("dynamic element index must be an integer".to_string());
                }
                self.verify_element(id, op.operands[0], result_ty, None, types)
            }
        }
    }

    /// Shared shape check for static and dynamic slice extraction.
    fn verify_slice(
        &self,
        id: OpId,
        target: ValueId,
        result_ty: TypeId,
        start: Option<u64>,
        types: &TypeDb,
    ) -> KairoResult<()> {
        let target_ty = self.value(target).ty;
        let fail = |message: &str| -> KairoResult<()> {
            Err(InternalError::new(format!("op {}: {message}", id.as_raw())))
        };
        match (types.get(target_ty), types.get(result_ty)) {
            (Type::Int { width: tw, .. }, Type::Int { width: rw, .. }) => {
                if let Some(start) = start {
                    if start + u64::from(*rw) > u64::from(*tw) {
                        return fail("slice exceeds target width");
                    }
                } else if rw > tw {
                    return fail("slice wider than its target");
                }
                Ok(())
            }
            (
                Type::Array {
                    element: te,
                    size: ts,
                },
                Type::Array {
                    element: re,
                    size: rs,
                },
            ) => {
                if te != re {
                    return fail("slice element type must match its target");
                }
                if let Some(start) = start {
                    if start + u64::from(*rs) > u64::from(*ts) {
                        return fail("slice exceeds target size");
                    }
                } else if rs > ts {
                    return fail("slice larger than its target");
                }
                Ok(())
            }
            _ => fail("slice extraction applies to integers and arrays"),
        }
    }

    /// Shared shape check for static and dynamic element extraction.
    fn verify_element(
        &self,
        id: OpId,
        target: ValueId,
        result_ty: TypeId,
        index: Option<u64>,
        types: &TypeDb,
    ) -> KairoResult<()> {
        let target_ty = self.value(target).ty;
        let fail = |message: &str| -> KairoResult<()> {
            Err(InternalError::new(format!("op {}: {message}", id.as_raw())))
        };
        match types.get(target_ty) {
            Type::Array { element, size } => {
                if result_ty != *element {
                    return fail("element result must be the array's element type");
                }
                if let Some(index) = index {
                    if index >= u64::from(*size) {
                        return fail("element index out of bounds");
                    }
                }
                Ok(())
            }
            _ => fail("element extraction applies to arrays"),
        }
    }
}
