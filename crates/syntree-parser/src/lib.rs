//! Syntree Parser
//!
//! Parses labelled bracket notation into a validated
//! [`ElementStore`](syntree_core::element::ElementStore):
//!
//! ```text
//! [S [NP Kim] [VP [V left] [Adv ^ very early]]]
//! ```
//!
//! - `[` opens a node whose label runs up to the next whitespace or bracket.
//! - Text inside a node that is not itself a bracketed node becomes a leaf.
//! - A leaf starting with `^` asks for a triangle connector.
//! - A bracketed label without contents is a leaf of its own.
//!
//! # Example
//!
//! ```
//! let store = syntree_parser::parse("[S [NP Kim] [VP left early]]").unwrap();
//! assert_eq!(store.len(), 5);
//! assert_eq!(store.root().content(), "S");
//! ```

pub mod error;

mod parser;

pub use error::{ErrorCode, ParseError};

use log::{debug, info};

use syntree_core::element::ElementStore;

/// Parse bracket notation into an element store.
///
/// # Errors
///
/// Returns a [`ParseError`] with the byte span of the first syntax error.
pub fn parse(source: &str) -> Result<ElementStore, ParseError> {
    info!(bytes = source.len(); "Parsing bracket notation");

    let elements = parser::parse_elements(source)?;
    debug!(elements = elements.len(); "Bracket notation parsed");

    ElementStore::new(elements).map_err(|err| {
        ParseError::new(
            ErrorCode::E102,
            format!("invalid tree structure: {err}"),
            0..source.len(),
        )
    })
}
