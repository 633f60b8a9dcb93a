//! Error types for syntree operations.
//!
//! This module provides the main error type [`SyntreeError`] which wraps
//! the error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use syntree_core::element::StructureError;
use syntree_parser::ParseError;

use crate::layout::LayoutError;

/// The main error type for syntree operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the error so callers
/// can point at the offending span.
#[derive(Debug, Error)]
pub enum SyntreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Invalid tree: {0}")]
    Structure(#[from] StructureError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for SyntreeError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl SyntreeError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
