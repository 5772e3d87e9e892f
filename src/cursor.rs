// src/cursor.rs

//! Scan position over one FPL file plus the primitive token readers that every
//! entity parser is built from.
//!
//! Readers never fail: a malformed token is reported as a [`Diagnostic`] and a
//! best-effort value (0 for numbers, an empty string for strings) is returned.

use log::warn;
use std::fmt;

/// The kind of problem found while scanning a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    BadNumber,
    NumberOutOfRange,
    MissingString,
    UnterminatedString,
    GarbageAtEndOfLine,
    /// Text remained where another footprint was expected.
    UnexpectedContent,
}

impl DiagnosticKind {
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticKind::BadNumber => "Bad number",
            DiagnosticKind::NumberOutOfRange => "Number out of range",
            DiagnosticKind::MissingString => "Missing string",
            DiagnosticKind::UnterminatedString => "Missing closing double quote in string",
            DiagnosticKind::GarbageAtEndOfLine => "Garbage at end of line",
            DiagnosticKind::UnexpectedContent => "Footprint parse problem",
        }
    }
}

/// A line-tagged problem report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file_name: String,
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file_name, self.line, self.kind.message())
    }
}

pub struct Cursor {
    contents: Vec<u8>,
    file_name: String,
    offset: usize,
    line: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Cursor {
    pub fn new(contents: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Cursor {
            contents: contents.into(),
            file_name: file_name.into(),
            offset: 0,
            line: 1,
            diagnostics: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.contents.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn peek(&self) -> Option<u8> {
        self.contents.get(self.offset).copied()
    }

    /// Records a diagnostic at the current line and logs it.
    pub fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            file_name: self.file_name.clone(),
            line: self.line,
            kind,
        };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Skips spaces and tabs. Newlines are left alone.
    pub fn white_space_skip(&mut self) {
        while let Some(b' ' | b'\t') = self.peek() {
            self.offset += 1;
        }
    }

    /// Consumes `tag` (which includes its trailing colon) if it comes next.
    /// On a mismatch only the leading white space is consumed.
    pub fn tag_match(&mut self, tag: &str) -> bool {
        self.white_space_skip();
        if self.contents[self.offset..].starts_with(tag.as_bytes()) {
            self.offset += tag.len();
            true
        } else {
            false
        }
    }

    /// Reads an optionally negative decimal integer.
    pub fn long_parse(&mut self) -> i64 {
        self.white_space_skip();

        let negative = self.peek() == Some(b'-');
        if negative {
            self.offset += 1;
        }

        let mut value: i64 = 0;
        let mut digits = 0usize;
        let mut overflow = false;
        while let Some(byte @ b'0'..=b'9') = self.peek() {
            let digit = i64::from(byte - b'0');
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(v) => value = v,
                None => {
                    overflow = true;
                    value = i64::MAX;
                }
            }
            digits += 1;
            self.offset += 1;
        }

        if digits == 0 {
            self.report(DiagnosticKind::BadNumber);
        } else if overflow {
            self.report(DiagnosticKind::NumberOutOfRange);
        }

        if negative { -value } else { value }
    }

    /// Reads either a double-quoted string or a bare token ended by a space,
    /// `\r`, `\n` or end of input.
    pub fn string_parse(&mut self) -> String {
        self.white_space_skip();

        match self.peek() {
            None => {
                self.report(DiagnosticKind::MissingString);
                String::new()
            }
            Some(b'"') => {
                self.offset += 1;
                let start = self.offset;
                loop {
                    match self.peek() {
                        Some(b'"') => {
                            let text = self.text(start, self.offset);
                            self.offset += 1;
                            return text;
                        }
                        // The newline stays put so `end_of_line` still sees it.
                        Some(b'\n') | None => {
                            self.report(DiagnosticKind::UnterminatedString);
                            return self.text(start, self.offset);
                        }
                        Some(_) => self.offset += 1,
                    }
                }
            }
            Some(_) => {
                let start = self.offset;
                while let Some(byte) = self.peek() {
                    if matches!(byte, b' ' | b'\n' | b'\r') {
                        break;
                    }
                    self.offset += 1;
                }
                if self.offset == start {
                    self.report(DiagnosticKind::MissingString);
                }
                self.text(start, self.offset)
            }
        }
    }

    /// Consumes the rest of the line including its `\n`. Anything other than
    /// trailing white space or `\r` is reported once.
    pub fn end_of_line(&mut self) {
        self.white_space_skip();

        let mut garbage = false;
        while let Some(byte) = self.peek() {
            self.offset += 1;
            match byte {
                b'\n' => {
                    self.line += 1;
                    break;
                }
                b'\r' => {}
                _ => garbage = true,
            }
        }

        if garbage {
            self.report(DiagnosticKind::GarbageAtEndOfLine);
        }
    }

    /// Consumes white space, carriage returns and at most one newline.
    pub fn new_lines_skip(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' => self.offset += 1,
                b'\n' => {
                    self.offset += 1;
                    self.line += 1;
                    break;
                }
                _ => break,
            }
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.contents[start..end]).into_owned()
    }
}
