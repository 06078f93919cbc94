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

//! Errors surfaced when attaching expressions to a model.

use crate::error::CompileError;
use thiserror::Error;

/// Attachment failure. The model is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttachError {
    /// The instruction stream did not compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The validation point does not cover every model variable.
    #[error("sample point has {found} values but the model has {expected} variables")]
    SampleDimension { expected: usize, found: usize },

    /// Constraint bounds with `lhs > rhs`.
    #[error("constraint bounds are inverted: lhs {lhs} > rhs {rhs}")]
    InvalidBounds { lhs: f64, rhs: f64 },
}

impl AttachError {
    /// Returns the compile error when attachment failed during compilation.
    pub fn compile_error(&self) -> Option<&CompileError> {
        match self {
            AttachError::Compile(err) => Some(err),
            _ => None,
        }
    }
}
