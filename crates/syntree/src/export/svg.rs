//! SVG rendering of laid-out trees.
//!
//! Labels become `<text>` elements centered in their boxes, line connectors
//! become `<line>` and triangles become `<polygon>`. The canvas size comes
//! straight from the [`Layout`].

use std::io::Write;

use log::{debug, info};
use svg::{self, node::Text as SvgText, node::element as svg_element};

use syntree_core::{color::Color, element::ElementKind, text::FontSpec};

use super::{Error, Exporter};
use crate::layout::{ConnectorGeometry, DrawEntry, Layout};

const NODE_COLOR: &str = "blue";
const LEAF_COLOR: &str = "green";
const TRACE_COLOR: &str = "red";
const PLAIN_COLOR: &str = "black";

const LINE_COLOR: &str = "black";
const LINE_WIDTH: f32 = 1.0;

/// Builder for [`Svg`] exporters.
///
/// # Examples
///
/// ```
/// use syntree::export::svg::SvgBuilder;
/// use syntree_core::text::FontSpec;
///
/// let exporter = SvgBuilder::new(Vec::new())
///     .with_font(FontSpec::new("serif", 14))
///     .with_colorize(false)
///     .build();
/// ```
pub struct SvgBuilder<W> {
    writer: W,
    font: FontSpec,
    colorize: bool,
    background: Option<Color>,
}

impl<W: Write> SvgBuilder<W> {
    /// Creates a builder writing the document to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            font: FontSpec::default(),
            colorize: true,
            background: None,
        }
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Draw nodes, leaves and traces in distinct colors.
    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn build(self) -> Svg<W> {
        Svg {
            writer: self.writer,
            font: self.font,
            colorize: self.colorize,
            background: self.background,
        }
    }
}

/// SVG exporter writing one document per exported layout.
pub struct Svg<W> {
    writer: W,
    font: FontSpec,
    colorize: bool,
    background: Option<Color>,
}

impl<W> Svg<W> {
    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders `layout` into an SVG document.
    pub fn render(&self, layout: &Layout) -> svg::Document {
        let canvas = layout.canvas();
        let mut doc = svg::Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", canvas.width(), canvas.height()),
            )
            .set("width", canvas.width())
            .set("height", canvas.height());

        if let Some(background) = &self.background {
            let rect = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", canvas.width())
                .set("height", canvas.height())
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha());
            doc = doc.add(rect);
        }

        let mut connectors = svg_element::Group::new()
            .set("stroke", LINE_COLOR)
            .set("stroke-width", LINE_WIDTH)
            .set("fill", "none");
        for connector in layout.connectors() {
            connectors = match *connector.geometry() {
                ConnectorGeometry::Line { from, to } => connectors.add(
                    svg_element::Line::new()
                        .set("x1", from.x())
                        .set("y1", from.y())
                        .set("x2", to.x())
                        .set("y2", to.y()),
                ),
                ConnectorGeometry::Triangle {
                    apex,
                    base_left,
                    base_right,
                } => connectors.add(svg_element::Polygon::new().set(
                    "points",
                    format!(
                        "{},{} {},{} {},{}",
                        apex.x(),
                        apex.y(),
                        base_left.x(),
                        base_left.y(),
                        base_right.x(),
                        base_right.y()
                    ),
                )),
            };
        }

        let mut labels = svg_element::Group::new()
            .set("font-family", self.font.family())
            .set("font-size", self.font.size());
        for entry in layout.entries() {
            labels = labels.add(self.render_entry(layout, entry));
        }

        doc.add(connectors).add(labels)
    }

    fn render_entry(&self, layout: &Layout, entry: &DrawEntry) -> svg_element::Text {
        let row_top = layout.row_top(entry.level()).unwrap_or_default();
        svg_element::Text::new("")
            .set("x", entry.center_x())
            .set("y", row_top + layout.row_height() / 2.0)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("fill", self.fill(entry))
            .add(SvgText::new(entry.content()))
    }

    fn fill(&self, entry: &DrawEntry) -> &'static str {
        if !self.colorize {
            return PLAIN_COLOR;
        }
        match entry.kind() {
            _ if entry.is_trace() => TRACE_COLOR,
            ElementKind::Node => NODE_COLOR,
            ElementKind::Leaf => LEAF_COLOR,
        }
    }
}

impl<W: Write> Exporter for Svg<W> {
    fn export_layout(&mut self, layout: &Layout) -> Result<(), Error> {
        info!(
            entries = layout.entries().len(),
            connectors = layout.connectors().len();
            "Exporting SVG"
        );
        let doc = self.render(layout);
        svg::write(&mut self.writer, &doc).map_err(Error::Io)?;
        debug!("SVG written");
        Ok(())
    }
}
