//! Geometric layout of syntax trees.
//!
//! The engine turns a validated [`ElementStore`] into a [`Layout`]: the
//! horizontal position of every element, the connector drawn between every
//! parent and child, and the canvas size. It runs as a strict pipeline where
//! each pass consumes the previous pass's output map:
//!
//! ```text
//! ElementStore
//!     ↓ width        (Widths: subtree footprint per element)
//!     ↓ indent       (Indents: packed, left-aligned positions)
//!     ↓ symmetrize   (Indents: parents centered over children; optional)
//!     ↓ connector    (Connectors: line or triangle per edge)
//!     ↓ canvas       (Size)
//! Layout
//! ```
//!
//! Text is measured only through the [`TextMetrics`] seam, so the same tree
//! and configuration always produce the same layout.

mod canvas;
mod connector;
mod indent;
mod symmetrize;
mod width;

pub use connector::{Connector, ConnectorGeometry, ConnectorShape};

use std::collections::HashMap;

use log::{debug, info, warn};
use thiserror::Error;

use syntree_core::{
    element::{Element, ElementId, ElementKind, ElementStore},
    geometry::Size,
    text::{FontSpec, TextMetrics},
};

use crate::config::LayoutConfig;

use canvas::Rows;
use connector::{Mode, Slot};

/// Subtree width of every element, in pixels.
pub type Widths = HashMap<ElementId, f32>;

/// Horizontal offset of every element's left edge, in pixels.
pub type Indents = HashMap<ElementId, f32>;

/// Smallest width a measured label may have.
const MIN_LABEL_WIDTH: f32 = 1.0;

/// Errors raised before layout starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("tree has {actual} elements, the limit is {limit}")]
    TooManyElements { limit: usize, actual: usize },

    #[error("tree is {actual} levels deep, the limit is {limit}")]
    TooDeep { limit: usize, actual: usize },
}

/// A positioned label ready to be drawn.
///
/// The label is centered horizontally in the box `[x, x + width]` of row
/// `level`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawEntry {
    id: ElementId,
    x: f32,
    level: usize,
    width: f32,
    content: String,
    kind: ElementKind,
    trace: bool,
}

impl DrawEntry {
    fn new(element: &Element, x: f32, width: f32) -> Self {
        let label = element.label();
        Self {
            id: element.id(),
            x,
            level: element.level(),
            width,
            content: label.display_text().into_owned(),
            kind: element.kind(),
            trace: label.is_trace(),
        }
    }

    fn translate_x(mut self, dx: f32) -> Self {
        self.x += dx;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Left edge of the box the label is centered in.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Horizontal center of the label.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Display text with markers removed.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Whether the label carried a trace marker.
    pub fn is_trace(&self) -> bool {
        self.trace
    }
}

/// The finished layout of one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    canvas: Size,
    offset: f32,
    row_height: f32,
    rows: Vec<f32>,
    entries: Vec<DrawEntry>,
    connectors: Vec<Connector>,
    widths: Widths,
    indents: Indents,
}

impl Layout {
    /// Canvas size covering every entry and connector.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Horizontal shift applied to every entry and connector.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Height of one row of labels.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Top y coordinate of `level`'s row.
    pub fn row_top(&self, level: usize) -> Option<f32> {
        self.rows.get(level).copied()
    }

    pub fn entries(&self) -> &[DrawEntry] {
        &self.entries
    }

    pub fn entry(&self, id: ElementId) -> Option<&DrawEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Returns the connector joining `child` to its parent, if one is drawn.
    pub fn connector_to(&self, child: ElementId) -> Option<&Connector> {
        self.connectors
            .iter()
            .find(|connector| connector.child() == child)
    }

    /// Subtree widths computed by the width pass.
    pub fn widths(&self) -> &Widths {
        &self.widths
    }

    /// Final indents, before the canvas offset is applied.
    pub fn indents(&self) -> &Indents {
        &self.indents
    }
}

/// Measures element labels with clamping.
pub(crate) struct LabelMeasure<'a> {
    metrics: &'a dyn TextMetrics,
    font: FontSpec,
}

impl<'a> LabelMeasure<'a> {
    pub(crate) fn new(metrics: &'a dyn TextMetrics, font: FontSpec) -> Self {
        Self { metrics, font }
    }

    /// Measured width of the element's display text, at least one pixel.
    pub(crate) fn text_width(&self, element: &Element) -> f32 {
        let text = element.label().display_text();
        let width = self.metrics.measure(&text, &self.font).width();
        if width >= MIN_LABEL_WIDTH {
            return width;
        }
        if !text.is_empty() {
            warn!(id:% = element.id(), text:% = text, width; "Text metrics too small, clamping");
        }
        MIN_LABEL_WIDTH
    }

    /// Text width plus half a font size of padding on each side.
    pub(crate) fn padded_width(&self, element: &Element) -> f32 {
        self.text_width(element) + f32::from(self.font.size())
    }
}

/// Layout engine for a single configuration and text measurer.
///
/// # Examples
///
/// ```
/// use syntree::{config::LayoutConfig, layout::Engine};
/// use syntree_core::text::MonospaceMetrics;
///
/// let store = syntree_parser::parse("[S [NP Kim] [VP left early]]").unwrap();
/// let config = LayoutConfig::default();
/// let metrics = MonospaceMetrics::default();
///
/// let layout = Engine::new(&config, &metrics).layout(&store).unwrap();
/// assert_eq!(layout.entries().len(), 5);
/// assert!(layout.canvas().width() > 0.0);
/// ```
pub struct Engine<'a> {
    config: &'a LayoutConfig,
    metrics: &'a dyn TextMetrics,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a LayoutConfig, metrics: &'a dyn TextMetrics) -> Self {
        Self { config, metrics }
    }

    /// Lay out `store`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the tree exceeds the configured depth or
    /// element count.
    pub fn layout(&self, store: &ElementStore) -> Result<Layout, LayoutError> {
        self.check_limits(store)?;
        info!(
            elements = store.len(),
            levels = store.level_count(),
            symmetrize = self.config.symmetrize();
            "Calculating tree layout"
        );

        let measure = LabelMeasure::new(self.metrics, self.config.font());
        let rows = Rows::new(self.config);

        let widths = width::calculate(store, &measure);
        let packed = indent::assign(store, &widths);
        debug!(root_width = widths[&store.root().id()]; "Packed layout calculated");

        let (entries, connectors, indents, offset, canvas_width) = if self.config.symmetrize() {
            let symmetrized = symmetrize::run(
                store,
                &widths,
                &packed,
                &measure,
                self.config.leaf_style(),
                &rows,
            );
            let canvas_width = symmetrized
                .width
                .unwrap_or_else(|| canvas::packed_width(store, &widths));
            (
                symmetrized.entries,
                symmetrized.connectors,
                symmetrized.indents,
                symmetrized.offset,
                canvas_width,
            )
        } else {
            let (entries, connectors) = self.packed_output(store, &widths, &packed, &measure, &rows);
            (
                entries,
                connectors,
                packed,
                0.0,
                canvas::packed_width(store, &widths),
            )
        };

        let canvas = Size::new(canvas_width, canvas::height(store.level_count(), &rows));
        debug!(
            width = canvas.width(),
            height = canvas.height(),
            offset,
            connectors = connectors.len();
            "Canvas sized"
        );

        Ok(Layout {
            canvas,
            offset,
            row_height: rows.row_height(),
            rows: (0..store.level_count()).map(|level| rows.top(level)).collect(),
            entries,
            connectors,
            widths,
            indents,
        })
    }

    fn check_limits(&self, store: &ElementStore) -> Result<(), LayoutError> {
        if store.len() > self.config.max_elements() {
            return Err(LayoutError::TooManyElements {
                limit: self.config.max_elements(),
                actual: store.len(),
            });
        }
        if store.level_count() > self.config.max_depth() {
            return Err(LayoutError::TooDeep {
                limit: self.config.max_depth(),
                actual: store.level_count(),
            });
        }
        Ok(())
    }

    /// Draw entries and connectors for the packed, left-aligned mode.
    fn packed_output(
        &self,
        store: &ElementStore,
        widths: &Widths,
        indents: &Indents,
        measure: &LabelMeasure<'_>,
        rows: &Rows,
    ) -> (Vec<DrawEntry>, Vec<Connector>) {
        let mut entries = Vec::with_capacity(store.len());
        let mut connectors = Vec::with_capacity(store.len().saturating_sub(1));

        for level in 0..store.level_count() {
            for element in store.at_level(level) {
                let slot = Slot::new(indents[&element.id()], widths[&element.id()]);
                entries.push(DrawEntry::new(element, slot.x(), slot.width()));

                let Some(parent) = store.parent(element.id()) else {
                    continue;
                };
                let parent_slot = Slot::new(indents[&parent.id()], widths[&parent.id()]);
                let aligned = connector::aligned(slot.x(), parent_slot.x());
                if let Some(shape) =
                    connector::shape(self.config.leaf_style(), Mode::Packed, element, aligned)
                {
                    connectors.push(Connector::new(
                        element,
                        parent,
                        shape,
                        slot,
                        parent_slot,
                        measure.text_width(element),
                        rows,
                    ));
                }
            }
        }

        (entries, connectors)
    }
}


#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::{
        test_utils::{BrokenMetrics, FixedMetrics, id, sample_store},
        *,
    };
    use crate::config::LeafStyle;

    fn config(symmetrize: bool) -> LayoutConfig {
        LayoutConfig::default()
            .with_font("sans-serif", 10)
            .with_leaf_style(LeafStyle::Auto)
            .with_symmetrize(symmetrize)
            .with_element_padding(5)
            .with_vertical_spacing(10)
            .with_top_bottom_margin(10)
    }

    #[test]
    fn test_packed_scenario() {
        let config = config(false);
        let layout = Engine::new(&config, &FixedMetrics)
            .layout(&sample_store())
            .unwrap();

        assert_approx_eq!(f32, layout.indents()[&id(0)], 0.0);
        let np_leaf = layout.connector_to(id(2)).unwrap();
        assert_eq!(np_leaf.shape(), ConnectorShape::Line);
        let vp_leaf = layout.connector_to(id(4)).unwrap();
        assert_eq!(vp_leaf.shape(), ConnectorShape::Triangle);
        assert_approx_eq!(f32, vp_leaf.geometry().base_width().unwrap(), 100.0);

        // 3 rows of 20px, 2 gaps of 20px, 10px margins
        assert_approx_eq!(f32, layout.canvas().height(), 120.0);
        // Kim (30 + 10) + "left early" (100 + 10)
        assert_approx_eq!(f32, layout.canvas().width(), 150.0);
        assert_approx_eq!(f32, layout.offset(), 0.0);
        assert_eq!(layout.entries().len(), 5);
        assert_eq!(layout.connectors().len(), 4);
    }

    #[test]
    fn test_symmetric_scenario() {
        let config = config(true);
        let layout = Engine::new(&config, &FixedMetrics)
            .layout(&sample_store())
            .unwrap();

        // NP centered over Kim (center 15), VP over "left early" (40 + 50)
        let indents = layout.indents();
        let np_center = indents[&id(1)] + 10.0;
        let vp_center = indents[&id(3)] + 10.0;
        assert_approx_eq!(f32, np_center, 15.0);
        assert_approx_eq!(f32, vp_center, 90.0);
        assert_approx_eq!(f32, indents[&id(0)] + 5.0, (np_center + vp_center) / 2.0);

        assert_approx_eq!(f32, layout.offset(), 0.0);
        assert_approx_eq!(f32, layout.canvas().width(), 150.0);
        assert_eq!(
            layout.connector_to(id(4)).unwrap().shape(),
            ConnectorShape::Triangle
        );
        assert_eq!(
            layout.connector_to(id(2)).unwrap().shape(),
            ConnectorShape::Line
        );
    }

    #[test]
    fn test_entries_carry_display_text() {
        let store = ElementStore::new(vec![
            Element::node(id(0), None, 0, "NP"),
            Element::leaf(id(1), Some(id(0)), 1, "+t+"),
        ])
        .unwrap();
        let config = config(false);
        let layout = Engine::new(&config, &FixedMetrics).layout(&store).unwrap();

        let trace = layout.entry(id(1)).unwrap();
        assert_eq!(trace.content(), "t");
        assert!(trace.is_trace());
        assert_eq!(trace.kind(), ElementKind::Leaf);
        assert_eq!(trace.level(), 1);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let store = sample_store();
        for symmetrize in [false, true] {
            let config = config(symmetrize);
            let engine = Engine::new(&config, &FixedMetrics);
            assert_eq!(engine.layout(&store).unwrap(), engine.layout(&store).unwrap());
        }
    }

    #[test]
    fn test_element_limit() {
        let config = config(false).with_limits(64, 4);
        let err = Engine::new(&config, &FixedMetrics)
            .layout(&sample_store())
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::TooManyElements {
                limit: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let config = config(false).with_limits(2, 100);
        let err = Engine::new(&config, &FixedMetrics)
            .layout(&sample_store())
            .unwrap_err();
        assert_eq!(err, LayoutError::TooDeep { limit: 2, actual: 3 });
    }

    #[test]
    fn test_depth_limit_counts_rows() {
        let config = config(false).with_limits(3, 100);
        let layout = Engine::new(&config, &FixedMetrics)
            .layout(&sample_store())
            .unwrap();
        assert!(layout.row_top(2).is_some());
        assert_eq!(layout.row_top(3), None);
    }

    #[test]
    fn test_broken_metrics_degrade() {
        for symmetrize in [false, true] {
            let config = config(symmetrize);
            let layout = Engine::new(&config, &BrokenMetrics)
                .layout(&sample_store())
                .unwrap();
            assert!(layout.canvas().width() >= 1.0);
            for width in layout.widths().values() {
                assert!(*width >= 1.0);
            }
        }
    }

    #[test]
    fn test_row_tops() {
        let config = config(false);
        let layout = Engine::new(&config, &FixedMetrics)
            .layout(&sample_store())
            .unwrap();
        assert_eq!(layout.row_top(0), Some(10.0));
        assert_eq!(layout.row_top(1), Some(50.0));
        assert_eq!(layout.row_top(2), Some(90.0));
        assert_eq!(layout.row_top(3), None);
        assert_approx_eq!(f32, layout.row_height(), 20.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::{
        test_utils::{FixedMetrics, tree_strategy},
        *,
    };

    // ===================
    // Property Test Functions
    // ===================

    /// Laying out the same tree twice gives identical layouts.
    fn check_idempotent(store: &ElementStore, symmetrize: bool) -> Result<(), TestCaseError> {
        let config = LayoutConfig::default()
            .with_font("sans-serif", 10)
            .with_symmetrize(symmetrize);
        let engine = Engine::new(&config, &FixedMetrics);

        let first = engine
            .layout(store)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let second = engine
            .layout(store)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.entries().len(), store.len());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn packed_layout_is_idempotent(store in tree_strategy()) {
            check_idempotent(&store, false)?;
        }

        #[test]
        fn symmetric_layout_is_idempotent(store in tree_strategy()) {
            check_idempotent(&store, true)?;
        }
    }
}
