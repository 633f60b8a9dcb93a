//! Configuration types for syntree diagram rendering.
//!
//! This module provides configuration structures that control how trees are
//! laid out and styled. All types implement [`serde::Deserialize`] so they can
//! be loaded from TOML files; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Font, spacing, connector style, symmetrization and limits.
//! - [`StyleConfig`] - Colorization and background color.
//!
//! # Example
//!
//! ```
//! # use syntree::config::{AppConfig, LeafStyle};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().leaf_style(), LeafStyle::Auto);
//! assert!(config.layout().symmetrize());
//! ```

use serde::Deserialize;

use syntree_core::{color::Color, text::FontSpec};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the layout configuration for in-place overrides.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// How leaves are attached to their parents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafStyle {
    /// Leaves are drawn without any connector.
    Nothing,
    /// Multi-word leaves aligned with their parent get a triangle.
    #[default]
    Auto,
    /// Multi-word leaves always get a triangle.
    Always,
}

/// Layout settings: font, spacing, connector style and resource limits.
///
/// All spacing values are pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    leaf_style: LeafStyle,
    symmetrize: bool,
    font_family: String,
    font_size: u16,
    element_padding: u16,
    vertical_spacing: u16,
    top_bottom_margin: u16,
    max_depth: usize,
    max_elements: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            leaf_style: LeafStyle::Auto,
            symmetrize: true,
            font_family: "sans-serif".to_string(),
            font_size: 16,
            element_padding: 5,
            vertical_spacing: 16,
            top_bottom_margin: 10,
            max_depth: 64,
            max_elements: 4096,
        }
    }
}

impl LayoutConfig {
    pub fn with_leaf_style(mut self, leaf_style: LeafStyle) -> Self {
        self.leaf_style = leaf_style;
        self
    }

    pub fn with_symmetrize(mut self, symmetrize: bool) -> Self {
        self.symmetrize = symmetrize;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: u16) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    pub fn with_element_padding(mut self, padding: u16) -> Self {
        self.element_padding = padding;
        self
    }

    pub fn with_vertical_spacing(mut self, spacing: u16) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    pub fn with_top_bottom_margin(mut self, margin: u16) -> Self {
        self.top_bottom_margin = margin;
        self
    }

    /// Sets the maximum number of rows and elements accepted by the engine.
    pub fn with_limits(mut self, max_depth: usize, max_elements: usize) -> Self {
        self.max_depth = max_depth;
        self.max_elements = max_elements;
        self
    }

    pub fn set_leaf_style(&mut self, leaf_style: LeafStyle) {
        self.leaf_style = leaf_style;
    }

    pub fn set_symmetrize(&mut self, symmetrize: bool) {
        self.symmetrize = symmetrize;
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn leaf_style(&self) -> LeafStyle {
        self.leaf_style
    }

    pub fn symmetrize(&self) -> bool {
        self.symmetrize
    }

    /// Returns the font used to measure and draw every label.
    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_family.clone(), self.font_size)
    }

    pub fn font_size(&self) -> f32 {
        f32::from(self.font_size)
    }

    pub fn element_padding(&self) -> f32 {
        f32::from(self.element_padding)
    }

    pub fn vertical_spacing(&self) -> f32 {
        f32::from(self.vertical_spacing)
    }

    pub fn top_bottom_margin(&self) -> f32 {
        f32::from(self.top_bottom_margin)
    }

    /// Maximum number of rows, the root row included.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }
}

/// Visual styling configuration for rendered diagrams.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Draw nodes, leaves and traces in distinct colors.
    colorize: bool,

    /// Background color as a CSS color string; transparent when unset.
    background_color: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            colorize: true,
            background_color: None,
        }
    }
}

impl StyleConfig {
    pub fn new(colorize: bool, background_color: Option<String>) -> Self {
        Self {
            colorize,
            background_color,
        }
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}
