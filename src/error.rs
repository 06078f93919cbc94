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

//! Errors raised while compiling one instruction stream.

use thiserror::Error;

/// Fieldless classification of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structural violation of the stream.
    MalformedStream,
    /// Variable index outside the known variable table.
    IndexOutOfRange,
    /// Operator or operand combination the solver cannot express.
    UnsupportedOperator,
    /// Deferred-operand capacity exhausted.
    DepthExceeded,
    /// Division by the literal constant `0`.
    DivisionByZero,
}

/// Compilation failure for a single expression.
///
/// Every variant is fatal for the expression being compiled and carries the
/// slot position of the offending token (the stream length for failures
/// detected at end of stream).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// An operator is missing operands, an opcode is unknown, or operands
    /// are left over at the end of the stream.
    #[error("malformed instruction stream at slot {position}: {reason}")]
    MalformedStream { position: usize, reason: String },

    /// A `VAR` payload does not name one of the `count` solver variables.
    #[error("variable index {index} at slot {position} is outside the {count} known variables")]
    IndexOutOfRange {
        position: usize,
        index: f64,
        count: usize,
    },

    /// The operator is recognised but cannot be built for these operands.
    #[error("unsupported operator {operator} at slot {position}: {hint}")]
    UnsupportedOperator {
        position: usize,
        operator: &'static str,
        hint: String,
    },

    /// More operands were deferred than the configured limit allows.
    #[error(
        "deferred operands exceed the limit of {limit} at slot {position}; simplify or split the expression"
    )]
    DepthExceeded { position: usize, limit: usize },

    /// A `DIV` whose divisor is the constant `0`.
    #[error("division by the constant 0 at slot {position}")]
    DivisionByZero { position: usize },
}

impl CompileError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        CompileError::MalformedStream {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(
        position: usize,
        operator: &'static str,
        hint: impl Into<String>,
    ) -> Self {
        CompileError::UnsupportedOperator {
            position,
            operator,
            hint: hint.into(),
        }
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::MalformedStream { .. } => ErrorKind::MalformedStream,
            CompileError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            CompileError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            CompileError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            CompileError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
        }
    }

    /// Returns the slot position the error refers to.
    pub fn position(&self) -> usize {
        match self {
            CompileError::MalformedStream { position, .. }
            | CompileError::IndexOutOfRange { position, .. }
            | CompileError::UnsupportedOperator { position, .. }
            | CompileError::DepthExceeded { position, .. }
            | CompileError::DivisionByZero { position } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_slot() {
        let err = CompileError::DepthExceeded {
            position: 14,
            limit: 2,
        };
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert_eq!(err.position(), 14);
        assert!(err.to_string().contains("slot 14"));

        let err = CompileError::unsupported(3, "POW", "rewrite x^y as exp(y*log(x))");
        assert!(err.to_string().contains("exp(y*log(x))"));
    }
}
