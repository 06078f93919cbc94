/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Register machine state for one compilation pass.

use super::*;
use crate::graph::{BinaryOp, UnaryOp};
use crate::stream::{Opcode, StreamCounts};

use super::deferred::{DeferredStacks, SlotKind};
use super::dispatch;
use super::registry::VariableRegistry;

/// Working state of a single pass: node arena, leaf table, argument
/// registers and deferred stacks. Created per stream and consumed by
/// [`CompileContext::into_compiled`].
pub(super) struct CompileContext {
    graph: ExprGraph,
    registry: VariableRegistry,
    deferred: DeferredStacks,
    arg0: Option<Operand>,
    arg1: Option<Operand>,
    variable_count: usize,
}

impl CompileContext {
    pub(super) fn new(counts: StreamCounts, variable_count: usize, depth_limit: usize) -> Self {
        Self {
            graph: ExprGraph::with_capacity(counts.node_capacity()),
            registry: VariableRegistry::new(variable_count, counts.variables),
            deferred: DeferredStacks::new(depth_limit),
            arg0: None,
            arg1: None,
            variable_count,
        }
    }

    /// Handles `[NUM, c]` and `[VAR, i]` without running the state machine.
    pub(super) fn compile_trivial(&mut self, slots: &[f64]) -> Result<Option<NodeId>, CompileError> {
        if slots.len() != 2 {
            return Ok(None);
        }
        match TokenReader::new(slots, self.variable_count).next() {
            Some(Ok((_, Token::Num(value)))) => Ok(Some(self.graph.build_const(value))),
            Some(Ok((position, Token::Var(index)))) => self.register(position, index).map(Some),
            Some(Err(err)) => Err(err),
            _ => Ok(None),
        }
    }

    pub(super) fn register(&mut self, position: usize, index: usize) -> Result<NodeId, CompileError> {
        self.registry.register(&mut self.graph, position, index)
    }

    /// Stages a constant or variable. A third operand parks the oldest one.
    pub(super) fn push_operand(
        &mut self,
        position: usize,
        operand: Operand,
    ) -> Result<(), CompileError> {
        match (self.arg0, self.arg1) {
            (None, _) => self.arg0 = Some(operand),
            (Some(_), None) => self.arg1 = Some(operand),
            (Some(oldest), Some(newer)) => {
                self.defer(position, oldest)?;
                self.arg0 = Some(newer);
                self.arg1 = Some(operand);
            }
        }
        Ok(())
    }

    /// Parks `operand` on the matching deferred stack. Constants become
    /// constant leaves and travel on the sub-expression stack.
    fn defer(&mut self, position: usize, operand: Operand) -> Result<(), CompileError> {
        let (kind, node) = match operand {
            Operand::Var(id) => (SlotKind::Var, id),
            Operand::Expr(id) => (SlotKind::Expr, id),
            Operand::Const(value) => {
                // Check capacity before touching the arena.
                if self.deferred.depth() >= self.depth_limit() {
                    return Err(CompileError::DepthExceeded {
                        position,
                        limit: self.depth_limit(),
                    });
                }
                (SlotKind::Expr, self.graph.build_const(value))
            }
        };
        self.deferred.push(position, kind, node)
    }

    fn depth_limit(&self) -> usize {
        self.deferred.limit()
    }

    pub(super) fn apply_binary(&mut self, position: usize, op: BinaryOp) -> Result<(), CompileError> {
        let mnemonic = Opcode::from(op).mnemonic();
        let Some(arg0) = self.arg0 else {
            return Err(CompileError::malformed(
                position,
                format!("{mnemonic} without operands"),
            ));
        };

        let (arg1, flip) = match self.arg1 {
            Some(arg1) => (arg1, false),
            None => match self.deferred.pop() {
                Some((SlotKind::Var, id)) => (Operand::Var(id), true),
                Some((SlotKind::Expr, id)) => (Operand::Expr(id), true),
                None => {
                    return Err(CompileError::malformed(
                        position,
                        format!("{mnemonic} needs two operands, found only {arg0}"),
                    ));
                }
            },
        };

        let node = dispatch::build_binary(&mut self.graph, position, op, arg0, arg1, flip)?;
        self.arg0 = Some(Operand::Expr(node));
        self.arg1 = None;
        Ok(())
    }

    pub(super) fn apply_unary(&mut self, position: usize, op: UnaryOp) -> Result<(), CompileError> {
        if let Some(current) = self.arg1.take() {
            if let Some(oldest) = self.arg0 {
                self.defer(position, oldest)?;
            }
            self.arg0 = Some(current);
        }
        let Some(operand) = self.arg0 else {
            return Err(CompileError::malformed(
                position,
                format!("{} without an operand", Opcode::from(op).mnemonic()),
            ));
        };

        let child = dispatch::materialise(&mut self.graph, operand);
        let node = self.graph.build_unary(op, child);
        self.arg0 = Some(Operand::Expr(node));
        Ok(())
    }

    /// Checks the end-of-stream state and returns the top-level node.
    pub(super) fn finish(&self, position: usize) -> Result<NodeId, CompileError> {
        if !self.deferred.is_empty() {
            return Err(CompileError::malformed(
                position,
                format!("stream ends with {}", self.deferred.describe()),
            ));
        }
        match (self.arg0, self.arg1) {
            (Some(Operand::Expr(root)), None) => Ok(root),
            (None, _) => Err(CompileError::malformed(position, "empty stream")),
            (Some(arg0), None) => Err(CompileError::malformed(
                position,
                format!("stream ends with an unconsumed operand {arg0}"),
            )),
            (Some(arg0), Some(arg1)) => Err(CompileError::malformed(
                position,
                format!("stream ends with unconsumed operands {arg0} and {arg1}"),
            )),
        }
    }

    pub(super) fn into_compiled(self, root: NodeId) -> CompiledExpr {
        CompiledExpr {
            graph: self.graph,
            root,
            leaves: self.registry.into_leaves(),
        }
    }
}

impl fmt::Display for CompileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |slot: Option<Operand>| slot.map_or_else(|| "-".to_string(), |op| op.to_string());
        write!(
            f,
            "arg0={} arg1={} deferred={} nodes={}",
            show(self.arg0),
            show(self.arg1),
            self.deferred.depth(),
            self.graph.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_stacks_reject_a_constant_before_building_its_leaf() {
        let mut ctx = CompileContext::new(StreamCounts::default(), 1, 1);
        let first = ctx.register(0, 0).unwrap();
        ctx.push_operand(0, Operand::Var(first)).unwrap();
        ctx.push_operand(2, Operand::Const(1.0)).unwrap();
        let second = ctx.register(4, 0).unwrap();
        // Parks x0; the stacks are now full.
        ctx.push_operand(4, Operand::Var(second)).unwrap();
        assert_eq!(ctx.deferred.depth(), 1);

        let third = ctx.register(6, 0).unwrap();
        let nodes = ctx.graph.len();
        let err = ctx.push_operand(6, Operand::Var(third)).unwrap_err();
        assert_eq!(
            err,
            CompileError::DepthExceeded {
                position: 6,
                limit: 1
            }
        );
        assert_eq!(ctx.graph.len(), nodes);
        assert_eq!(ctx.deferred.depth(), 1);
    }
}
