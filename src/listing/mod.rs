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

//! `nom` parser for mnemonic listings.
//!
//! A listing is a whitespace-separated sequence of instructions:
//! - `NUM <float>` and `VAR <index>` (`VAR x3` is accepted)
//! - bare operator and function mnemonics (`ADD`, `SIN`, ...)
//! - `#` and `//` line comments
//!
//! Mnemonics are case-insensitive.

mod utils;

use crate::diagnostics::Span;

use crate::diagnostics::{ListingError, SourceSpan};
use crate::stream::{InstructionStream, Opcode};
use nom::Parser;
use nom::{
    IResult,
    combinator::all_consuming,
    error::{VerboseError, VerboseErrorKind, context},
    multi::many0,
    sequence::{delimited, preceded, terminated},
};

use self::utils::{index, number, word, ws0, ws1};

type PResult<'a, O> = IResult<Span<'a>, O, VerboseError<Span<'a>>>;

/// One parsed listing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Instruction {
    Num(f64),
    Var(usize),
    Op(Opcode),
}

/// Parses a listing into an instruction stream.
pub fn parse_listing(source: &str) -> Result<InstructionStream, ListingError> {
    parse_listing_in_source(source, "<listing>")
}

/// Parses a listing while tagging diagnostics with `source_name`.
pub fn parse_listing_in_source(
    source: &str,
    source_name: &str,
) -> Result<InstructionStream, ListingError> {
    let input = Span::new(source);
    let (_, items) = match all_consuming(delimited(ws0, many0(terminated(instruction, ws0)), ws0))
        .parse(input)
    {
        Ok(v) => v,
        Err(err) => return Err(parse_error_to_listing_error(err, source_name, source)),
    };

    Ok(items
        .into_iter()
        .fold(InstructionStream::new(), |stream, item| match item {
            Instruction::Num(value) => stream.num(value),
            Instruction::Var(index) => stream.var(index),
            Instruction::Op(opcode) => stream.op(opcode),
        }))
}

fn instruction(input: Span<'_>) -> PResult<'_, Instruction> {
    let (rest, mnemonic) = word(input)?;
    let Some(opcode) = Opcode::from_mnemonic(mnemonic.fragment()) else {
        // Unknown words are reported at the word itself.
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(mnemonic, VerboseErrorKind::Context("instruction mnemonic"))],
        }));
    };
    match opcode {
        Opcode::Num => context("numeric literal", preceded(ws1, number))
            .map(Instruction::Num)
            .parse(rest)
            .map_err(cut),
        Opcode::Var => context("variable index", preceded(ws1, index))
            .map(Instruction::Var)
            .parse(rest)
            .map_err(cut),
        op => Ok((rest, Instruction::Op(op))),
    }
}

/// Missing payloads are fatal: backtracking would only hide the real cause.
fn cut<E>(err: nom::Err<E>) -> nom::Err<E> {
    match err {
        nom::Err::Error(e) => nom::Err::Failure(e),
        other => other,
    }
}

/// Converts a `nom` verbose error into a listing diagnostic.
fn parse_error_to_listing_error(
    err: nom::Err<VerboseError<Span<'_>>>,
    source_name: &str,
    source: &str,
) -> ListingError {
    match err {
        nom::Err::Incomplete(_) => ListingError::message_in_file("Incomplete listing", source_name),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            // Anchor at the innermost context label.
            let anchor = e
                .errors
                .iter()
                .find(|(_, kind)| matches!(kind, VerboseErrorKind::Context(_)))
                .or_else(|| e.errors.first());
            let Some((span, kind)) = anchor else {
                return ListingError::message_in_file("Syntax error", source_name);
            };
            let detail = match kind {
                VerboseErrorKind::Context("instruction mnemonic") => {
                    let text = span.fragment().split_whitespace().next().unwrap_or("");
                    if text.is_empty() {
                        "Syntax error: expected an instruction mnemonic".to_string()
                    } else {
                        format!("Unknown instruction '{text}'")
                    }
                }
                VerboseErrorKind::Context(ctx) => format!("Syntax error: expected {ctx}"),
                VerboseErrorKind::Char(c) => format!("Syntax error: expected '{c}'"),
                VerboseErrorKind::Nom(kind) => format!("Syntax error near {kind:?}"),
            };
            let token_len = span
                .fragment()
                .find(char::is_whitespace)
                .unwrap_or(span.fragment().len());
            let mut range = SourceSpan::of(*span);
            range.end = range.start + token_len;
            ListingError::from_span_in_source(detail, source_name, source, &range)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_instructions_with_comments() {
        let stream = parse_listing(
            "# x0 - x1 + 1\n\
             VAR 0 var x1 // second operand\n\
             SUB\n\
             num 1 ADD\n",
        )
        .expect("listing should parse");
        assert_eq!(stream.as_slice(), &[1.0, 0.0, 1.0, 1.0, 6.0, 0.0, 1.0, 5.0]);
    }

    #[test]
    fn listing_round_trips_through_rendering() {
        let text = "NUM 2 VAR 0 MUL VAR 3 SIN SUB NUM -0.5 POW";
        let stream = parse_listing(text).unwrap();
        assert_eq!(stream.listing(), text);
        assert_eq!(parse_listing(&stream.listing()).unwrap(), stream);
    }

    #[test]
    fn empty_listing_is_an_empty_stream() {
        assert!(parse_listing("  // nothing\n").unwrap().is_empty());
    }

    #[test]
    fn reports_unknown_mnemonic_with_location() {
        let err = parse_listing("VAR 0\nVAR 1 MOD").expect_err("MOD is not an instruction");
        assert_eq!(err.message, "Unknown instruction 'MOD'");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 7);
        assert_eq!(err.pointer, "      ^^^");
        assert!(err.to_string().contains("<listing>:2:7"));
    }

    #[test]
    fn reports_missing_payload() {
        let err = parse_listing("NUM 1 NUM").expect_err("payload is missing");
        assert_eq!(err.message, "Syntax error: expected numeric literal");
        assert_eq!(err.line, 1);

        let err = parse_listing_in_source("VAR y", "fixture.nl").expect_err("bad index");
        assert_eq!(err.message, "Syntax error: expected variable index");
        assert_eq!(err.column, 5);
        assert!(err.to_string().contains("fixture.nl:1:5"));
    }

    #[test]
    fn rejects_stray_symbols() {
        let err = parse_listing("VAR 0 + VAR 1").expect_err("`+` is not a mnemonic");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 7);
    }
}
