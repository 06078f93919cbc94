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

//! Compiler from flat nonlinear instruction streams to solver expression
//! graphs.
//!
//! This crate provides:
//! - An instruction-stream encoding (`NUM`, `VAR`, operators, functions) with
//!   a builder and a mnemonic listing form.
//! - A single-pass compiler that rebuilds operand structure from the stream
//!   using two argument registers and bounded deferred-operand stacks.
//! - An append-only expression graph ([`ExprGraph`]) with evaluation and
//!   infix rendering.
//! - Attachment of compiled graphs to a [`Model`] as constraints or as an
//!   objective term, with optional sample-point validation.
//!
//! # Pipeline
//!
//! 1. Scan the stream once to size the node arena.
//! 2. Classify tokens and drive the register machine.
//! 3. Check the end-of-stream state and hand back the top-level node.
//! 4. Optionally evaluate at a sample point and attach to the model.
//!
//! # Example
//!
//! ```
//! use nlexpr::{CompileOptions, compile, parse_listing};
//!
//! // x0 - x1 + 1
//! let stream = parse_listing("VAR 0 VAR 1 SUB NUM 1 ADD").unwrap();
//! let expr = compile(&stream, 2, &CompileOptions::default()).unwrap();
//! assert_eq!(expr.evaluate(&[3.0, 1.0]), Some(3.0));
//! assert_eq!(expr.to_string(), "((x0 - x1) + 1)");
//! ```

mod compiler;
mod diagnostics;
mod error;
mod graph;
mod listing;
mod model;
mod options;
mod stream;

pub use compiler::{CompiledExpr, compile, compile_graph};
pub use diagnostics::{ListingError, SourceSpan};
pub use error::{CompileError, ErrorKind};
pub use graph::{BinaryOp, ExprGraph, Node, NodeId, UnaryOp};
pub use listing::{parse_listing, parse_listing_in_source};
pub use model::{
    AttachError, AttachReport, Model, NonlinearConstraint, NonlinearRequest, OBJECTIVE_AUX_NAME,
    Target, ValidationWarning, VarId, Variable, add_nonlinear_con,
};
pub use options::{CompileOptions, DEFAULT_MAX_DEPTH, DEFAULT_TOLERANCE};
pub use stream::{InstructionStream, Opcode, StreamCounts, Token, TokenReader};

/// Parses a listing and compiles it in one step.
pub fn compile_listing(
    source: &str,
    variable_count: usize,
    options: &CompileOptions,
) -> Result<CompiledExpr, Box<dyn std::error::Error + Send + Sync>> {
    let stream = parse_listing(source)?;
    Ok(compile(&stream, variable_count, options)?)
}

#[cfg(test)]
mod proptests;
