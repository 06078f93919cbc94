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

//! Bounded stacks for operands parked ahead of their operator.

use super::*;

/// Which deferred stack a parked operand lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SlotKind {
    /// Built sub-expression (materialised constants included).
    Expr,
    /// Variable leaf.
    Var,
}

/// Sub-expression stack, variable stack and the process-order stack that
/// records which of the two to draw from next.
#[derive(Debug, Clone)]
pub(super) struct DeferredStacks {
    exprs: Vec<NodeId>,
    vars: Vec<NodeId>,
    order: Vec<SlotKind>,
    limit: usize,
}

impl DeferredStacks {
    pub(super) fn new(limit: usize) -> Self {
        Self {
            exprs: Vec::new(),
            vars: Vec::new(),
            order: Vec::new(),
            limit,
        }
    }

    /// Combined depth of both operand stacks.
    pub(super) fn depth(&self) -> usize {
        self.exprs.len() + self.vars.len()
    }

    pub(super) fn limit(&self) -> usize {
        self.limit
    }

    pub(super) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(super) fn push(
        &mut self,
        position: usize,
        kind: SlotKind,
        node: NodeId,
    ) -> Result<(), CompileError> {
        if self.depth() >= self.limit {
            return Err(CompileError::DepthExceeded {
                position,
                limit: self.limit,
            });
        }
        match kind {
            SlotKind::Expr => self.exprs.push(node),
            SlotKind::Var => self.vars.push(node),
        }
        self.order.push(kind);
        Ok(())
    }

    /// Pops the most recently parked operand.
    pub(super) fn pop(&mut self) -> Option<(SlotKind, NodeId)> {
        let kind = self.order.pop()?;
        let node = match kind {
            SlotKind::Expr => self.exprs.pop(),
            SlotKind::Var => self.vars.pop(),
        }?;
        Some((kind, node))
    }

    /// Short description of the residue left at end of stream.
    pub(super) fn describe(&self) -> String {
        format!(
            "{} deferred sub-expression(s) and {} deferred variable(s)",
            self.exprs.len(),
            self.vars.len()
        )
    }
}
