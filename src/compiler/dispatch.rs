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

//! Node construction for every operand-kind pair.

use super::*;
use crate::graph::BinaryOp;

/// Builds `op` over the register pair `(arg0, arg1)`.
///
/// With `flip` set, `arg1` came off the deferred stacks and is the logical
/// first operand. Constants are materialised as leaves here, so every kind
/// pair maps onto the same node shape.
pub(super) fn build_binary(
    graph: &mut ExprGraph,
    position: usize,
    op: BinaryOp,
    arg0: Operand,
    arg1: Operand,
    flip: bool,
) -> Result<NodeId, CompileError> {
    let (_, second) = if flip { (arg1, arg0) } else { (arg0, arg1) };
    check_second_operand(position, op, second)?;

    let lhs = materialise(graph, arg0);
    let rhs = materialise(graph, arg1);
    // Add and Mul are symmetric; only order-sensitive nodes keep the flag.
    let flip = flip && !op.is_commutative();
    Ok(graph.build_binary(op, lhs, rhs, flip))
}

/// Node for a register operand, building a constant leaf when needed.
pub(super) fn materialise(graph: &mut ExprGraph, operand: Operand) -> NodeId {
    match operand {
        Operand::Const(value) => graph.build_const(value),
        Operand::Var(id) | Operand::Expr(id) => id,
    }
}

fn check_second_operand(
    position: usize,
    op: BinaryOp,
    second: Operand,
) -> Result<(), CompileError> {
    match (op, second) {
        (BinaryOp::Pow, Operand::Var(_) | Operand::Expr(_)) => Err(CompileError::unsupported(
            position,
            "POW",
            format!(
                "exponent must be a constant, found {}; rewrite x^y as exp(y*log(x))",
                second.kind_name()
            ),
        )),
        (BinaryOp::Div, Operand::Const(value)) if value == 0.0 => {
            Err(CompileError::DivisionByZero { position })
        }
        _ => Ok(()),
    }
}
