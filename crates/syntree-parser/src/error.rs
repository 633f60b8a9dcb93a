//! Error type for bracket-notation parsing.
//!
//! A [`ParseError`] carries an [`ErrorCode`], a human readable message, the
//! byte span of the offending input and an optional help text. Front ends
//! use the span to point at the problem in the source.

use std::{fmt, ops::Range};

use thiserror::Error;

/// Stable codes identifying each kind of parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed bracket syntax.
    E100,
    /// Text left over after the root node was closed.
    E101,
    /// The parsed elements do not form a valid tree.
    E102,
    /// Brackets are nested deeper than the parser accepts.
    E103,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::E100 => "E100",
            Self::E101 => "E101",
            Self::E102 => "E102",
            Self::E103 => "E103",
        };
        f.write_str(code)
    }
}

/// Error produced while parsing bracket notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    code: ErrorCode,
    message: String,
    span: Range<usize>,
    help: Option<String>,
}

impl ParseError {
    /// Create a new parse error covering `span` of the source.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Attach a help text to this error.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte range of the source the error refers to.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}
