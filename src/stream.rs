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

//! Instruction stream encoding and token classification.
//!
//! A stream is a flat `f64` array. Control codes select the token kind; `NUM`
//! and `VAR` markers are followed by one payload slot, operators and functions
//! occupy a single slot.

use crate::error::CompileError;
use crate::graph::{BinaryOp, UnaryOp};
use std::fmt;

/// Control codes understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Num,
    Var,
    /// Register tag for a built sub-expression; never valid inside a stream.
    Expr,
    Mul,
    Div,
    Add,
    Sub,
    Square,
    Sqrt,
    Pow,
    Exp,
    Log,
    Sin,
    Cos,
    Tan,
    Min,
    Max,
    Abs,
    Sign,
}

const OPCODES: [Opcode; 19] = [
    Opcode::Num,
    Opcode::Var,
    Opcode::Expr,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Square,
    Opcode::Sqrt,
    Opcode::Pow,
    Opcode::Exp,
    Opcode::Log,
    Opcode::Sin,
    Opcode::Cos,
    Opcode::Tan,
    Opcode::Min,
    Opcode::Max,
    Opcode::Abs,
    Opcode::Sign,
];

impl Opcode {
    /// Decodes a control slot. Non-integral and unknown codes yield `None`.
    pub fn from_code(code: f64) -> Option<Self> {
        if code.fract() != 0.0 || code < 0.0 {
            return None;
        }
        OPCODES.get(code as usize).copied()
    }

    /// Numeric control code written into streams.
    pub fn code(self) -> f64 {
        OPCODES
            .iter()
            .position(|op| *op == self)
            .unwrap_or_default() as f64
    }

    /// Upper-case listing mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Num => "NUM",
            Opcode::Var => "VAR",
            Opcode::Expr => "EXPR",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Square => "SQUARE",
            Opcode::Sqrt => "SQRT",
            Opcode::Pow => "POW",
            Opcode::Exp => "EXP",
            Opcode::Log => "LOG",
            Opcode::Sin => "SIN",
            Opcode::Cos => "COS",
            Opcode::Tan => "TAN",
            Opcode::Min => "MIN",
            Opcode::Max => "MAX",
            Opcode::Abs => "ABS",
            Opcode::Sign => "SIGN",
        }
    }

    /// Looks up a mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(word: &str) -> Option<Self> {
        OPCODES
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(word))
    }

    /// Returns whether the code is followed by a payload slot.
    pub fn has_payload(self) -> bool {
        matches!(self, Opcode::Num | Opcode::Var)
    }

    /// Returns whether the code denotes an operator or a function.
    pub fn is_operator(self) -> bool {
        !matches!(self, Opcode::Num | Opcode::Var | Opcode::Expr)
    }
}

impl From<BinaryOp> for Opcode {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Opcode::Add,
            BinaryOp::Sub => Opcode::Sub,
            BinaryOp::Mul => Opcode::Mul,
            BinaryOp::Div => Opcode::Div,
            BinaryOp::Pow => Opcode::Pow,
        }
    }
}

impl From<UnaryOp> for Opcode {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Square => Opcode::Square,
            UnaryOp::Sqrt => Opcode::Sqrt,
            UnaryOp::Exp => Opcode::Exp,
            UnaryOp::Log => Opcode::Log,
            UnaryOp::Abs => Opcode::Abs,
            UnaryOp::Sin => Opcode::Sin,
            UnaryOp::Cos => Opcode::Cos,
        }
    }
}

/// One classified stream entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Num(f64),
    /// Variable reference by 0-based solver index.
    Var(usize),
    /// Two-operand operator.
    Binary(BinaryOp),
    /// Single-operand function.
    Unary(UnaryOp),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(value) => write!(f, "NUM {value}"),
            Token::Var(index) => write!(f, "VAR {index}"),
            Token::Binary(op) => f.write_str(Opcode::from(*op).mnemonic()),
            Token::Unary(op) => f.write_str(Opcode::from(*op).mnemonic()),
        }
    }
}

/// Occurrence counts gathered by the sizing pre-pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCounts {
    /// `VAR` occurrences (one leaf each, repeats included).
    pub variables: usize,
    /// Operator and function occurrences.
    pub operators: usize,
    /// `NUM` occurrences.
    pub constants: usize,
}

impl StreamCounts {
    /// Upper bound on the number of graph nodes one compilation can build.
    pub fn node_capacity(&self) -> usize {
        (self.variables + self.operators + self.constants).max(1)
    }
}

/// Owned instruction stream with a small builder API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionStream {
    slots: Vec<f64>,
}

impl InstructionStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `NUM value`.
    pub fn num(mut self, value: f64) -> Self {
        self.slots.push(Opcode::Num.code());
        self.slots.push(value);
        self
    }

    /// Appends `VAR index`.
    pub fn var(mut self, index: usize) -> Self {
        self.slots.push(Opcode::Var.code());
        self.slots.push(index as f64);
        self
    }

    /// Appends a binary operator.
    pub fn binary(self, op: BinaryOp) -> Self {
        self.op(op.into())
    }

    /// Appends a function.
    pub fn unary(self, op: UnaryOp) -> Self {
        self.op(op.into())
    }

    /// Appends a raw control code without payload.
    pub fn op(mut self, opcode: Opcode) -> Self {
        self.slots.push(opcode.code());
        self
    }

    /// Raw slots.
    pub fn as_slice(&self) -> &[f64] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the stream has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Runs the sizing pre-pass.
    pub fn counts(&self) -> StreamCounts {
        scan(&self.slots)
    }

    /// Renders the stream as a mnemonic listing (`NUM 2 VAR 0 MUL`).
    pub fn listing(&self) -> String {
        listing(&self.slots)
    }
}

impl From<Vec<f64>> for InstructionStream {
    fn from(slots: Vec<f64>) -> Self {
        Self { slots }
    }
}

impl From<&[f64]> for InstructionStream {
    fn from(slots: &[f64]) -> Self {
        Self {
            slots: slots.to_vec(),
        }
    }
}

impl AsRef<[f64]> for InstructionStream {
    fn as_ref(&self) -> &[f64] {
        &self.slots
    }
}

impl fmt::Display for InstructionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.listing())
    }
}

/// Counts variable, operator and constant occurrences.
///
/// The scan is tolerant: unknown codes are skipped here and reported by the
/// classifier during the real pass.
pub fn scan(slots: &[f64]) -> StreamCounts {
    let mut counts = StreamCounts::default();
    let mut pos = 0;
    while pos < slots.len() {
        let opcode = Opcode::from_code(slots[pos]);
        match opcode {
            Some(Opcode::Num) => counts.constants += 1,
            Some(Opcode::Var) => counts.variables += 1,
            Some(op) if op.is_operator() => counts.operators += 1,
            _ => {}
        }
        pos += if opcode.is_some_and(Opcode::has_payload) {
            2
        } else {
            1
        };
    }
    counts
}

/// Renders raw slots as mnemonics. Undecodable codes render as `?<code>`.
pub fn listing(slots: &[f64]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut pos = 0;
    while pos < slots.len() {
        match Opcode::from_code(slots[pos]) {
            Some(op) if op.has_payload() => match slots.get(pos + 1) {
                Some(payload) => {
                    parts.push(format!("{} {payload}", op.mnemonic()));
                    pos += 2;
                    continue;
                }
                None => parts.push(op.mnemonic().to_string()),
            },
            Some(op) => parts.push(op.mnemonic().to_string()),
            None => parts.push(format!("?{}", slots[pos])),
        }
        pos += 1;
    }
    parts.join(" ")
}

/// Token classifier over raw slots.
///
/// Yields `(position, token)` pairs where `position` is the slot index of the
/// control code. End of stream is the terminal marker.
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    slots: &'a [f64],
    pos: usize,
    variable_count: usize,
}

impl<'a> TokenReader<'a> {
    /// Starts reading at slot 0. `variable_count` is only reported in index
    /// errors; range checks against it belong to the variable registry.
    pub fn new(slots: &'a [f64], variable_count: usize) -> Self {
        Self {
            slots,
            pos: 0,
            variable_count,
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns whether every slot has been consumed.
    pub fn is_finished(&self) -> bool {
        self.pos >= self.slots.len()
    }

    fn payload(&self, position: usize, opcode: Opcode) -> Result<f64, CompileError> {
        self.slots.get(position + 1).copied().ok_or_else(|| {
            CompileError::malformed(
                position,
                format!("{} marker without payload", opcode.mnemonic()),
            )
        })
    }

    fn classify(&mut self) -> Result<(usize, Token), CompileError> {
        let position = self.pos;
        let code = self.slots[position];
        let Some(opcode) = Opcode::from_code(code) else {
            return Err(CompileError::malformed(
                position,
                format!("unknown control code {code}"),
            ));
        };

        let token = match opcode {
            Opcode::Num => Token::Num(self.payload(position, opcode)?),
            Opcode::Var => {
                let index = self.payload(position, opcode)?;
                if index.is_nan() || index < 0.0 || index.fract() != 0.0 {
                    return Err(CompileError::IndexOutOfRange {
                        position,
                        index,
                        count: self.variable_count,
                    });
                }
                Token::Var(index as usize)
            }
            Opcode::Expr => {
                return Err(CompileError::malformed(
                    position,
                    "EXPR is a register tag and cannot appear in a stream",
                ));
            }
            Opcode::Mul => Token::Binary(BinaryOp::Mul),
            Opcode::Div => Token::Binary(BinaryOp::Div),
            Opcode::Add => Token::Binary(BinaryOp::Add),
            Opcode::Sub => Token::Binary(BinaryOp::Sub),
            Opcode::Pow => Token::Binary(BinaryOp::Pow),
            Opcode::Square => Token::Unary(UnaryOp::Square),
            Opcode::Sqrt => Token::Unary(UnaryOp::Sqrt),
            Opcode::Exp => Token::Unary(UnaryOp::Exp),
            Opcode::Log => Token::Unary(UnaryOp::Log),
            Opcode::Sin => Token::Unary(UnaryOp::Sin),
            Opcode::Cos => Token::Unary(UnaryOp::Cos),
            Opcode::Abs => Token::Unary(UnaryOp::Abs),
            Opcode::Tan => {
                return Err(CompileError::unsupported(
                    position,
                    "TAN",
                    "tangent has no solver primitive; use sin(x)/cos(x)",
                ));
            }
            Opcode::Min | Opcode::Max => {
                return Err(CompileError::unsupported(
                    position,
                    opcode.mnemonic(),
                    "min/max are not available as expression nodes",
                ));
            }
            Opcode::Sign => {
                return Err(CompileError::unsupported(
                    position,
                    "SIGN",
                    "sign has no solver primitive",
                ));
            }
        };

        self.pos += if opcode.has_payload() { 2 } else { 1 };
        Ok((position, token))
    }
}

impl Iterator for TokenReader<'_> {
    type Item = Result<(usize, Token), CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        let item = self.classify();
        if item.is_err() {
            // Stop after the first classification error.
            self.pos = self.slots.len();
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_codes_round_trip() {
        for (code, op) in OPCODES.iter().enumerate() {
            assert_eq!(op.code(), code as f64);
            assert_eq!(Opcode::from_code(code as f64), Some(*op));
            assert_eq!(Opcode::from_mnemonic(&op.mnemonic().to_lowercase()), Some(*op));
        }
        assert_eq!(Opcode::from_code(2.5), None);
        assert_eq!(Opcode::from_code(-1.0), None);
        assert_eq!(Opcode::from_code(19.0), None);
        assert_eq!(Opcode::from_code(f64::NAN), None);
    }

    #[test]
    fn classifier_advances_past_payloads() {
        let stream = InstructionStream::new()
            .num(2.0)
            .var(0)
            .binary(BinaryOp::Mul);
        let tokens: Vec<_> = TokenReader::new(stream.as_slice(), 1)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                (0, Token::Num(2.0)),
                (2, Token::Var(0)),
                (4, Token::Binary(BinaryOp::Mul)),
            ]
        );
    }

    #[test]
    fn classifier_rejects_missing_payload_and_bad_codes() {
        let err = TokenReader::new(&[1.0], 1).next().unwrap().unwrap_err();
        assert!(matches!(err, CompileError::MalformedStream { position: 0, .. }));

        let err = TokenReader::new(&[42.0], 1).next().unwrap().unwrap_err();
        assert!(err.to_string().contains("unknown control code 42"));

        let err = TokenReader::new(&[2.0], 1).next().unwrap().unwrap_err();
        assert!(err.to_string().contains("EXPR"));
    }

    #[test]
    fn classifier_rejects_fractional_and_negative_indices() {
        let err = TokenReader::new(&[1.0, -1.0], 1).next().unwrap().unwrap_err();
        assert!(matches!(err, CompileError::IndexOutOfRange { .. }));
        let err = TokenReader::new(&[1.0, 0.5], 1).next().unwrap().unwrap_err();
        assert!(matches!(err, CompileError::IndexOutOfRange { .. }));
    }

    #[test]
    fn classifier_stops_after_first_error() {
        let mut reader = TokenReader::new(&[14.0, 5.0], 1);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn unsupported_functions_are_recognised() {
        for code in [14.0, 15.0, 16.0, 18.0] {
            let err = TokenReader::new(&[1.0, 0.0, code], 1)
                .nth(1)
                .unwrap()
                .unwrap_err();
            assert!(matches!(
                err,
                CompileError::UnsupportedOperator { position: 2, .. }
            ));
        }
    }

    #[test]
    fn scan_counts_repeated_variables() {
        // x0 * x0 + 3
        let stream = InstructionStream::new()
            .var(0)
            .var(0)
            .binary(BinaryOp::Mul)
            .num(3.0)
            .binary(BinaryOp::Add);
        let counts = stream.counts();
        assert_eq!(
            counts,
            StreamCounts {
                variables: 2,
                operators: 2,
                constants: 1,
            }
        );
        assert_eq!(counts.node_capacity(), 5);
    }

    #[test]
    fn payload_values_equal_to_opcodes_are_not_miscounted() {
        // `VAR 3` and `NUM 5` carry payloads that look like MUL/ADD codes.
        let counts = scan(&[1.0, 3.0, 0.0, 5.0, 5.0]);
        assert_eq!(counts.variables, 1);
        assert_eq!(counts.constants, 1);
        assert_eq!(counts.operators, 1);
    }

    #[test]
    fn listing_renders_mnemonics() {
        let stream = InstructionStream::new()
            .var(0)
            .var(1)
            .binary(BinaryOp::Sub)
            .num(1.5)
            .unary(UnaryOp::Log);
        assert_eq!(stream.listing(), "VAR 0 VAR 1 SUB NUM 1.5 LOG");
        assert_eq!(listing(&[99.0, 0.0]), "?99 NUM");
    }
}
