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

//! Listing diagnostics with source snippets and caret pointers.

use nom_locate::LocatedSpan;
use std::fmt;

/// Parser input span carrying byte offsets and line/column info.
pub type Span<'a> = LocatedSpan<&'a str>;

/// Source range and anchor position for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based UTF-8 column.
    pub column: usize,
}

impl SourceSpan {
    /// Span covering exactly `fragment`.
    pub fn of(fragment: Span<'_>) -> Self {
        Self {
            start: fragment.location_offset(),
            end: fragment.location_offset() + fragment.fragment().len(),
            line: fragment.location_line() as usize,
            column: fragment.get_utf8_column(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Error returned by [`crate::parse_listing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingError {
    /// Human-readable error message.
    pub message: String,
    /// Listing label (`""` when unavailable).
    pub file: String,
    /// 1-based line number (`0` when unavailable).
    pub line: usize,
    /// 1-based column number (`0` when unavailable).
    pub column: usize,
    /// Source line where the error occurred.
    pub snippet: String,
    /// Caret pointer aligned to `snippet`.
    pub pointer: String,
}

impl ListingError {
    /// Creates an error with a source label but no line/column info.
    pub fn message_in_file(message: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: file.into(),
            line: 0,
            column: 0,
            snippet: String::new(),
            pointer: String::new(),
        }
    }

    /// Creates a source-mapped diagnostic.
    pub fn from_span_in_source(
        message: impl Into<String>,
        file: impl Into<String>,
        source: &str,
        span: &SourceSpan,
    ) -> Self {
        let snippet = source
            .lines()
            .nth(span.line.saturating_sub(1))
            .unwrap_or("")
            .to_string();
        // Clamp the caret to the snippet even when the span runs past it.
        let line_len = snippet.chars().count();
        let pointer_column = span.column.saturating_sub(1).min(line_len);
        let max_len = line_len.saturating_sub(pointer_column).max(1);
        let pointer_len = span.len().max(1).min(max_len);
        let pointer = format!("{}{}", " ".repeat(pointer_column), "^".repeat(pointer_len));

        Self {
            message: message.into(),
            file: file.into(),
            line: span.line,
            column: span.column,
            snippet,
            pointer,
        }
    }
}

impl fmt::Display for ListingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        match (self.line, self.file.is_empty()) {
            (0, true) => Ok(()),
            (0, false) => write!(f, " ({})", self.file),
            (line, _) => {
                let file = if self.file.is_empty() {
                    "<listing>"
                } else {
                    self.file.as_str()
                };
                let gutter = " ".repeat(line.to_string().len());
                write!(
                    f,
                    "\n{gutter}--> {file}:{line}:{}\n{gutter} |\n{line} | {}\n{gutter} | {}",
                    self.column, self.snippet, self.pointer
                )
            }
        }
    }
}

impl std::error::Error for ListingError {}
