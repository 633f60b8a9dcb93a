//! Canvas sizing and row geometry.

use syntree_core::element::ElementStore;

use super::Widths;
use crate::config::LayoutConfig;

/// Vertical metrics of the label rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Rows {
    margin: f32,
    row_height: f32,
    gap: f32,
}

impl Rows {
    pub(super) fn new(config: &LayoutConfig) -> Self {
        Self {
            margin: config.top_bottom_margin(),
            row_height: config.font_size() + 2.0 * config.element_padding(),
            gap: config.vertical_spacing() + config.font_size(),
        }
    }

    pub(super) fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Top y of `level`'s row.
    pub(super) fn top(&self, level: usize) -> f32 {
        let level = level as f32;
        self.margin + self.row_height * level + self.gap * level
    }

    /// Bottom y of `level`'s row, where connectors leave a parent.
    pub(super) fn bottom(&self, level: usize) -> f32 {
        self.top(level) + self.row_height
    }
}

/// Total canvas height for `levels` rows.
pub(super) fn height(levels: usize, rows: &Rows) -> f32 {
    let gaps = levels.saturating_sub(1) as f32;
    levels as f32 * rows.row_height + gaps * rows.gap + 2.0 * rows.margin
}

/// Canvas width of a packed layout: the combined width of level 0.
pub(super) fn packed_width(store: &ElementStore, widths: &Widths) -> f32 {
    store.at_level(0).map(|element| widths[&element.id()]).sum()
}
