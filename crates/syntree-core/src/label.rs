//! Label handling for element content.
//!
//! Element content is the raw text written in bracket notation. Before it is
//! measured or drawn it goes through two rewrites:
//!
//! - A mirrored marker pair such as `+t+` or `#-x-#` flags a trace leaf. The
//!   markers are stripped for display and only influence styling.
//! - The spacer `<>` is drawn as a plain space but does not separate words,
//!   so `the<>dog` counts as a single word for connector decisions.
//!
//! All operations work on `char` boundaries, so labels in multi-byte scripts
//! are handled the same way as ASCII labels.

use std::borrow::Cow;

/// Placeholder that renders as a space without splitting words.
pub const SPACER: &str = "<>";

/// Characters that may open (and, mirrored, close) a trace marker.
const MARKER_CHARS: [char; 6] = ['+', '-', '=', '*', '#', '~'];

/// A parsed view of an element's content.
///
/// # Examples
///
/// ```
/// # use syntree_core::label::Label;
/// let label = Label::new("+the<>dog barked+");
/// assert!(label.is_trace());
/// assert_eq!(label.display_text(), "the dog barked");
/// assert_eq!(label.word_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label<'a> {
    text: &'a str,
    trace: bool,
}

impl<'a> Label<'a> {
    /// Builds a label from raw element content.
    pub fn new(content: &'a str) -> Self {
        let trimmed = content.trim();
        match strip_marker(trimmed) {
            Some(text) => Self { text, trace: true },
            None => Self {
                text: trimmed,
                trace: false,
            },
        }
    }

    /// Returns the text to measure and draw.
    pub fn display_text(&self) -> Cow<'a, str> {
        if self.text.contains(SPACER) {
            Cow::Owned(self.text.replace(SPACER, " "))
        } else {
            Cow::Borrowed(self.text)
        }
    }

    /// Number of whitespace separated words, with spacers keeping words joined.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the content carried a trace marker pair.
    pub fn is_trace(&self) -> bool {
        self.trace
    }
}

/// Strips a mirrored marker pair, returning the enclosed text.
///
/// The opening run is every leading marker character; the closing run must be
/// the same run reversed. Returns `None` when the content is not wrapped.
fn strip_marker(text: &str) -> Option<&str> {
    let prefix_len: usize = text
        .chars()
        .take_while(|c| MARKER_CHARS.contains(c))
        .map(char::len_utf8)
        .sum();
    if prefix_len == 0 || prefix_len == text.len() {
        return None;
    }

    let closing: String = text[..prefix_len].chars().rev().collect();
    text[prefix_len..]
        .strip_suffix(closing.as_str())
        .filter(|inner| !inner.is_empty())
}
