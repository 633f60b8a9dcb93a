//! Text measurement for diagram labels.
//!
//! The layout engine never measures text itself: it asks a [`TextMetrics`]
//! implementation for the pixel size of a label in a given [`FontSpec`].
//!
//! # Overview
//!
//! - [`FontSpec`] - Font family and pixel size used for every label
//! - [`TextMetrics`] - The measurement seam consumed by the layout engine
//! - [`ShapedTextMetrics`] - Real font metrics through `cosmic-text` shaping
//! - [`MonospaceMetrics`] - Deterministic column-based metrics
//! - [`CachedMetrics`] - Memoizes identical lookups of any measurer
//!
//! # Quick Start
//!
//! ```
//! # use syntree_core::text::{FontSpec, MonospaceMetrics, TextMetrics};
//! let font = FontSpec::new("sans-serif", 16);
//! let metrics = MonospaceMetrics::default();
//! let size = metrics.measure("left early", &font);
//! assert!(size.width() > 0.0);
//! ```

use std::{
    cell::RefCell,
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, trace};
use unicode_width::UnicodeWidthStr;

use crate::geometry::Size;

/// Font family and size used to measure and draw labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    family: String,
    size: u16,
}

impl FontSpec {
    /// Creates a font specification.
    ///
    /// # Arguments
    ///
    /// * `family` - The font family name (e.g., "sans-serif", "Noto Serif")
    /// * `size` - The font size in pixels
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Returns the font family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the font size in pixels.
    pub fn size(&self) -> u16 {
        self.size
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("sans-serif", 16)
    }
}

/// Measures the pixel extent of a string in a font.
///
/// Implementations must be deterministic and side-effect free from the
/// caller's point of view, and must return a zero width for an empty string.
pub trait TextMetrics {
    /// Returns the width and height of `text` rendered in `font`.
    fn measure(&self, text: &str, font: &FontSpec) -> Size;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        (**self).measure(text, font)
    }
}

/// Deterministic measurer based on display columns.
///
/// Every column is `char_width_factor * font_size` wide; East Asian wide
/// characters count as two columns. Multi-line text is as wide as its widest
/// line and as tall as its line count.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    char_width_factor: f32,
    line_height_factor: f32,
}

impl MonospaceMetrics {
    /// Creates a measurer with explicit width and line height factors.
    pub fn new(char_width_factor: f32, line_height_factor: f32) -> Self {
        Self {
            char_width_factor,
            line_height_factor,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(0.6, 1.2)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let font_size = f32::from(font.size());
        let columns = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
        let lines = text.lines().count().max(1);

        Size::new(
            columns as f32 * font_size * self.char_width_factor,
            lines as f32 * font_size * self.line_height_factor,
        )
    }
}

/// Measurer backed by `cosmic-text` font discovery and shaping.
///
/// Font discovery is expensive, so all instances share one lazily created
/// [`FontSystem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapedTextMetrics;

impl ShapedTextMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl TextMetrics for ShapedTextMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        FONT_SYSTEM
            .get_or_init(|| {
                info!("Initializing FontSystem");
                Mutex::new(FontSystem::new())
            })
            .lock()
            .map(|mut font_system| shape_text(&mut font_system, text, font))
            .unwrap_or_else(|poisoned| shape_text(&mut poisoned.into_inner(), text, font))
    }
}

static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

/// Maps CSS generic family names onto cosmic-text families.
fn family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" | "sans" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" | "mono" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

/// Calculate the size of text in pixels using cosmic-text shaping.
fn shape_text(font_system: &mut FontSystem, text: &str, font: &FontSpec) -> Size {
    if text.is_empty() {
        return Size::default();
    }

    let font_size = f32::from(font.size());
    let metrics = Metrics::new(font_size, font_size * 1.15);

    let mut buffer = Buffer::new(font_system, metrics);
    let mut buffer = buffer.borrow_with(font_system);
    let attrs = Attrs::new().family(family(font.family()));

    buffer.set_size(None, None);
    buffer.set_text(text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(true);

    let mut max_width: f32 = 0.0;
    let mut total_height: f32 = 0.0;
    for run in buffer.layout_runs() {
        if let Some(last) = run.glyphs.last() {
            max_width = max_width.max(last.x + last.w);
        }
        total_height += metrics.line_height;
    }

    if total_height == 0.0 {
        // No font could shape the text; fall back to an average glyph width.
        max_width = text.chars().count() as f32 * font_size * 0.55;
        total_height = metrics.line_height;
    }

    trace!(text, width = max_width, height = total_height; "Measured text");
    Size::new(max_width, total_height)
}

/// Memoizes lookups of an inner measurer by `(text, font)`.
///
/// The layout engine may ask for the same label several times (subtree width,
/// centering, connector bases), so wrapping an expensive measurer avoids
/// repeated shaping.
#[derive(Debug)]
pub struct CachedMetrics<M> {
    inner: M,
    cache: RefCell<HashMap<(String, FontSpec), Size>>,
}

impl<M: TextMetrics> CachedMetrics<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct lookups stored so far.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl<M: TextMetrics> TextMetrics for CachedMetrics<M> {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        let key = (text.to_string(), font.clone());
        if let Some(size) = self.cache.borrow().get(&key) {
            return *size;
        }
        let size = self.inner.measure(text, font);
        self.cache.borrow_mut().insert(key, size);
        size
    }
}
