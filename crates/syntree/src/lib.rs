//! Syntree - Linguistic syntax tree diagrams from labelled bracket notation.
//!
//! Parsing, layout, and rendering of syntax trees such as
//! `[S [NP Kim] [VP left early]]`. Trees are laid out either packed to the
//! left or with every parent centered over its children, and rendered to SVG.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use syntree_core::{color, element, geometry, label, text};

pub use error::SyntreeError;

use log::{debug, info, trace};

use syntree_core::{
    element::{Element, ElementStore},
    text::{CachedMetrics, ShapedTextMetrics, TextMetrics},
};

use config::AppConfig;
use export::{Exporter, svg::SvgBuilder};
use layout::{Engine, Layout};

/// Builder for parsing, laying out and rendering syntax trees.
///
/// # Examples
///
/// ```rust,no_run
/// use syntree::{DiagramBuilder, config::AppConfig};
///
/// let source = "[S [NP Kim] [VP left early]]";
///
/// // With custom config
/// let config = AppConfig::default();
/// let builder = DiagramBuilder::new(config);
///
/// // Parse source to a tree
/// let tree = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Render the tree to SVG
/// let svg = builder.render_svg(&tree)
///     .expect("Failed to render");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    metrics: Box<dyn TextMetrics>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// Labels are measured with the system fonts through
    /// [`ShapedTextMetrics`], memoized per label.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            metrics: Box::new(CachedMetrics::new(ShapedTextMetrics::new())),
        }
    }

    /// Replace the text measurer.
    ///
    /// # Examples
    ///
    /// ```
    /// use syntree::{DiagramBuilder, text::MonospaceMetrics};
    ///
    /// let builder = DiagramBuilder::default().with_metrics(MonospaceMetrics::default());
    /// let tree = builder.parse("[S [NP Kim] [VP left early]]").unwrap();
    /// let layout = builder.layout(&tree).unwrap();
    /// assert_eq!(layout.entries().len(), 5);
    /// ```
    pub fn with_metrics(mut self, metrics: impl TextMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse bracket notation into a validated tree.
    ///
    /// # Errors
    ///
    /// Returns `SyntreeError::Parse` for syntax errors; the error keeps the
    /// source so the span can be shown.
    pub fn parse(&self, source: &str) -> Result<ElementStore, SyntreeError> {
        info!("Parsing tree");

        let store = syntree_parser::parse(source)
            .map_err(|err| SyntreeError::new_parse_error(err, source))?;

        debug!(elements = store.len(), levels = store.level_count(); "Tree parsed successfully");
        trace!(store:?; "Parsed tree");

        Ok(store)
    }

    /// Build a tree from elements assembled by hand.
    ///
    /// # Errors
    ///
    /// Returns `SyntreeError::Structure` if the elements do not form a
    /// single well-formed tree.
    pub fn from_elements(&self, elements: Vec<Element>) -> Result<ElementStore, SyntreeError> {
        let store = ElementStore::new(elements)?;
        debug!(elements = store.len(); "Tree validated");
        Ok(store)
    }

    /// Compute the geometric layout of a tree.
    ///
    /// # Errors
    ///
    /// Returns `SyntreeError::Layout` if the tree exceeds the configured
    /// depth or element count.
    pub fn layout(&self, tree: &ElementStore) -> Result<Layout, SyntreeError> {
        let layout = Engine::new(self.config.layout(), self.metrics.as_ref()).layout(tree)?;
        info!(
            width = layout.canvas().width(),
            height = layout.canvas().height();
            "Layout calculated"
        );
        Ok(layout)
    }

    /// Render a tree to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `SyntreeError` for layout, configuration or rendering errors.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use syntree::{DiagramBuilder, config::AppConfig};
    ///
    /// let builder = DiagramBuilder::new(AppConfig::default());
    ///
    /// let tree = builder.parse("[S [NP Kim] [VP left early]]")
    ///     .expect("Failed to parse");
    ///
    /// let svg = builder.render_svg(&tree)
    ///     .expect("Failed to render tree");
    ///
    /// println!("{}", svg);
    /// ```
    pub fn render_svg(&self, tree: &ElementStore) -> Result<String, SyntreeError> {
        let layout = self.layout(tree)?;
        let background = self
            .config
            .style()
            .background_color()
            .map_err(SyntreeError::Config)?;

        let mut svg_exporter = SvgBuilder::new(Vec::new())
            .with_font(self.config.layout().font())
            .with_colorize(self.config.style().colorize())
            .with_background(background)
            .build();
        svg_exporter.export_layout(&layout)?;

        let svg_string = String::from_utf8(svg_exporter.into_inner())
            .map_err(|err| export::Error::Render(err.to_string()))?;

        info!(bytes = svg_string.len(); "SVG rendered successfully");
        Ok(svg_string)
    }
}
