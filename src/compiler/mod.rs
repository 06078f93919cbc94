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

//! Single-pass compiler from instruction streams to [`ExprGraph`]s.
//!
//! The stream carries no explicit tree structure. Operands are staged in two
//! argument registers; when a third operand shows up before an operator has
//! consumed the pending pair, the oldest one is parked on the deferred stacks
//! and drawn back when an operator finds its second register empty.

mod context;
mod deferred;
mod dispatch;
mod registry;

use crate::error::CompileError;
use crate::graph::{ExprGraph, NodeId};
use crate::options::CompileOptions;
use crate::stream::{Token, TokenReader, scan};
use std::fmt;
use tracing::{debug, trace};

use self::context::CompileContext;

/// Content of one argument register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Operand {
    /// Literal read from a `NUM` token; no node is built until it is used.
    Const(f64),
    /// Variable leaf registered for a `VAR` token.
    Var(NodeId),
    /// Most recently built sub-expression.
    Expr(NodeId),
}

impl Operand {
    fn kind_name(&self) -> &'static str {
        match self {
            Operand::Const(_) => "NUM",
            Operand::Var(_) => "VAR",
            Operand::Expr(_) => "EXPR",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Const(value) => write!(f, "NUM {value}"),
            Operand::Var(id) => write!(f, "VAR {id}"),
            Operand::Expr(id) => write!(f, "EXPR {id}"),
        }
    }
}

/// Result of one successful compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    graph: ExprGraph,
    root: NodeId,
    leaves: Vec<NodeId>,
}

impl CompiledExpr {
    /// The finished graph.
    pub fn graph(&self) -> &ExprGraph {
        &self.graph
    }

    /// Top-level node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Variable leaves in stream order, one per `VAR` occurrence.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Evaluates the expression at `point` (one value per solver variable).
    pub fn evaluate(&self, point: &[f64]) -> Option<f64> {
        self.graph.evaluate(self.root, point)
    }

    /// Releases the leaf table and hands the graph over.
    pub fn into_graph(self) -> ExprGraph {
        self.graph
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graph.render(self.root))
    }
}

/// Compiles `stream` against a table of `variable_count` solver variables.
///
/// Each call works on fresh state; a failure leaves nothing behind.
pub fn compile(
    stream: impl AsRef<[f64]>,
    variable_count: usize,
    options: &CompileOptions,
) -> Result<CompiledExpr, CompileError> {
    let slots = stream.as_ref();
    let counts = scan(slots);
    let mut ctx = CompileContext::new(counts, variable_count, options.depth_limit());

    if let Some(root) = ctx.compile_trivial(slots)? {
        return Ok(ctx.into_compiled(root));
    }

    for item in TokenReader::new(slots, variable_count) {
        let (position, token) = item?;
        match token {
            Token::Num(value) => ctx.push_operand(position, Operand::Const(value))?,
            Token::Var(index) => {
                let leaf = ctx.register(position, index)?;
                ctx.push_operand(position, Operand::Var(leaf))?;
            }
            Token::Binary(op) => ctx.apply_binary(position, op)?,
            Token::Unary(op) => ctx.apply_unary(position, op)?,
        }
        trace!(position, %token, state = %ctx, "processed token");
    }

    let root = ctx.finish(slots.len())?;
    let compiled = ctx.into_compiled(root);
    debug!(
        slots = slots.len(),
        nodes = compiled.graph.len(),
        leaves = compiled.leaves.len(),
        expr = %compiled,
        "compiled nonlinear expression"
    );
    Ok(compiled)
}

/// Convenience wrapper returning the graph only.
pub fn compile_graph(
    stream: impl AsRef<[f64]>,
    variable_count: usize,
    options: &CompileOptions,
) -> Result<ExprGraph, CompileError> {
    compile(stream, variable_count, options).map(CompiledExpr::into_graph)
}
