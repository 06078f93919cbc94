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

//! Lexical helpers for listings.

use nom::Parser;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{digit1, multispace1, not_line_ending, one_of},
    combinator::{map_res, opt, recognize, value},
    error::context,
    multi::many0,
    number::complete::recognize_float_or_exceptions,
    sequence::{pair, preceded},
};

use super::{PResult, Span};

/// Parses a mnemonic word (`[A-Za-z]+`).
pub(super) fn word(input: Span<'_>) -> PResult<'_, Span<'_>> {
    take_while1(|c: char| c.is_ascii_alphabetic()).parse(input)
}

/// Parses a `NUM` payload. `inf` and `nan` are accepted.
pub(super) fn number(input: Span<'_>) -> PResult<'_, f64> {
    context(
        "numeric literal",
        map_res(recognize_float_or_exceptions, |s: Span<'_>| {
            s.fragment().parse::<f64>()
        }),
    )
    .parse(input)
}

/// Parses a `VAR` payload: an unsigned index with an optional `x` prefix.
pub(super) fn index(input: Span<'_>) -> PResult<'_, usize> {
    context(
        "variable index",
        map_res(
            recognize(preceded(opt(one_of("xX")), digit1)),
            |s: Span<'_>| s.fragment().trim_start_matches(['x', 'X']).parse::<usize>(),
        ),
    )
    .parse(input)
}

/// Skips whitespace and comments.
pub(super) fn ws0(input: Span<'_>) -> PResult<'_, ()> {
    value((), many0(alt((value((), multispace1), comment)))).parse(input)
}

/// Requires at least one whitespace or comment.
pub(super) fn ws1(input: Span<'_>) -> PResult<'_, ()> {
    value((), pair(alt((value((), multispace1), comment)), ws0)).parse(input)
}

/// Line comments (`// ...` and `# ...`).
fn comment(input: Span<'_>) -> PResult<'_, ()> {
    value(
        (),
        pair(alt((tag("//"), tag("#"))), opt(not_line_ending)),
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_accepts_optional_prefix() {
        let (_, plain) = index(Span::new("12")).unwrap();
        let (_, prefixed) = index(Span::new("x7")).unwrap();
        assert_eq!(plain, 12);
        assert_eq!(prefixed, 7);
        assert!(index(Span::new("-1")).is_err());
    }

    #[test]
    fn number_accepts_exponents_and_specials() {
        assert_eq!(number(Span::new("-1.5e2")).unwrap().1, -150.0);
        assert!(number(Span::new("inf")).unwrap().1.is_infinite());
        assert!(number(Span::new("NaN")).unwrap().1.is_nan());
    }

    #[test]
    fn trivia_skips_both_comment_styles() {
        let (rest, _) = ws0(Span::new("  # one\n// two\n  MUL")).unwrap();
        assert_eq!(*rest.fragment(), "MUL");
    }
}
