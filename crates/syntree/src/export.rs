//! Export functionality for syntree diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! turning a finished [`Layout`] into an output format. It is the final stage
//! in the syntree processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Bracket Notation
//!     ↓ parse
//! ElementStore
//!     ↓ layout
//! Layout (positioned labels and connectors)
//!     ↓ export (this module)
//! Output
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`SyntreeError::Export`] at the crate
//! boundary.
//!
//! [`SyntreeError::Export`]: crate::SyntreeError::Export

/// SVG export backend.
pub mod svg;

use crate::layout::Layout;

/// Abstraction for diagram export backends.
///
/// See the [`svg`] module for the built-in SVG implementation.
pub trait Exporter {
    /// Exports a finished layout to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_layout(&mut self, layout: &Layout) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
///
/// This type is converted into [`SyntreeError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`SyntreeError::Export`]: crate::SyntreeError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
