//! Centering parents over their children.
//!
//! Runs bottom-up over the packed layout: leaves keep their packed indent,
//! and each node is moved so its label is centered over the span between the
//! centers of its first and last child. A single fold over the result then
//! decides the horizontal offset that keeps overhanging labels on the canvas.

use std::collections::HashMap;

use log::{debug, trace};

use syntree_core::element::{ElementId, ElementStore};

use super::{
    DrawEntry, Indents, LabelMeasure, Widths,
    canvas::Rows,
    connector::{self, Connector, Mode, Slot},
};
use crate::config::LeafStyle;

/// Output of the centering pass, with the offset already applied to entries
/// and connectors.
#[derive(Debug)]
pub(super) struct Symmetrized {
    pub(super) entries: Vec<DrawEntry>,
    pub(super) connectors: Vec<Connector>,
    pub(super) indents: Indents,
    pub(super) offset: f32,
    /// Canvas width, when the offset forces one.
    pub(super) width: Option<f32>,
}

/// Left overhang and right extent over all elements.
#[derive(Debug, Default)]
struct Extent {
    /// Level and position of the furthest label overhanging x = 0.
    leftmost: Option<(usize, f32)>,
    /// Right edge of the widest subtree footprint.
    rightmost: f32,
}

pub(super) fn run(
    store: &ElementStore,
    widths: &Widths,
    packed: &Indents,
    measure: &LabelMeasure<'_>,
    style: LeafStyle,
    rows: &Rows,
) -> Symmetrized {
    let text_widths: HashMap<ElementId, f32> = store
        .iter()
        .map(|element| (element.id(), measure.text_width(element)))
        .collect();
    let mut indents = packed.clone();
    let mut connectors = Vec::with_capacity(store.len().saturating_sub(1));

    for level in (0..store.level_count()).rev() {
        for element in store.at_level(level) {
            let children = store.children(element.id());
            if children.is_empty() {
                continue;
            }

            let (left, right) = children.iter().fold(
                (f32::INFINITY, f32::NEG_INFINITY),
                |(left, right), child| {
                    let center = indents[child] + text_widths[child] / 2.0;
                    (left.min(center), right.max(center))
                },
            );
            let text_width = text_widths[&element.id()];
            let indent = left + (right - left) / 2.0 - text_width / 2.0;
            trace!(id:% = element.id(), left, right, indent; "Centered over children");
            indents.insert(element.id(), indent);

            let parent_slot = Slot::new(indent, text_width);
            for child in store.children_of(element.id()) {
                let Some(shape) = connector::shape(style, Mode::Symmetric, child, false) else {
                    continue;
                };
                let child_width = text_widths[&child.id()];
                connectors.push(Connector::new(
                    child,
                    element,
                    shape,
                    Slot::new(indents[&child.id()], child_width),
                    parent_slot,
                    child_width,
                    rows,
                ));
            }
        }
    }

    let entries: Vec<DrawEntry> = store
        .iter()
        .map(|element| {
            let id = element.id();
            DrawEntry::new(element, indents[&id], text_widths[&id])
        })
        .collect();

    let extent = entries.iter().fold(Extent::default(), |mut extent, entry| {
        let overhang = entry.x() - entry.width() / 2.0;
        let further = extent
            .leftmost
            .is_none_or(|(_, leftmost)| overhang < leftmost);
        if overhang < 0.0 && further {
            extent.leftmost = Some((entry.level(), overhang));
        }
        extent.rightmost = extent.rightmost.max(entry.x() + widths[&entry.id()]);
        extent
    });

    let mut offset = match extent.leftmost {
        Some((level, overhang)) if level != store.max_level() => -overhang / 2.0,
        _ => 0.0,
    };
    let min_x = entries
        .iter()
        .map(DrawEntry::x)
        .fold(f32::INFINITY, f32::min);
    if min_x + offset < 0.0 {
        offset = -min_x;
    }
    debug!(offset, leftmost:? = extent.leftmost, rightmost = extent.rightmost; "Symmetric offset");

    let width = (offset > 0.0).then_some(extent.rightmost + offset);
    Symmetrized {
        entries: entries
            .into_iter()
            .map(|entry| entry.translate_x(offset))
            .collect(),
        connectors: connectors
            .into_iter()
            .map(|connector| connector.translate_x(offset))
            .collect(),
        indents,
        offset,
        width,
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use syntree_core::text::FontSpec;

    use super::*;
    use crate::{
        config::LayoutConfig,
        layout::{
            indent,
            test_utils::{FixedMetrics, tree_strategy},
            width,
        },
    };

    fn symmetrize(store: &ElementStore) -> Symmetrized {
        let measure = LabelMeasure::new(&FixedMetrics, FontSpec::new("sans-serif", 10));
        let widths = width::calculate(store, &measure);
        let packed = indent::assign(store, &widths);
        let rows = Rows::new(&LayoutConfig::default().with_font("sans-serif", 10));
        run(store, &widths, &packed, &measure, LeafStyle::Auto, &rows)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every node's label is centered over the centers of its outer children.
    fn check_centering(store: &ElementStore) -> Result<(), TestCaseError> {
        let result = symmetrize(store);
        let center = |id: ElementId| {
            result
                .entries
                .iter()
                .find(|entry| entry.id() == id)
                .map(DrawEntry::center_x)
                .unwrap()
        };

        for element in store.iter() {
            let children = store.children(element.id());
            if children.is_empty() {
                continue;
            }
            let centers: Vec<f32> = children.iter().map(|&child| center(child)).collect();
            let left = centers.iter().copied().fold(f32::INFINITY, f32::min);
            let right = centers.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let own = center(element.id());
            prop_assert!(
                approx_eq!(f32, own, left + (right - left) / 2.0, epsilon = 1.0),
                "{} centered at {own}, children span {left}..{right}",
                element.id()
            );
        }
        Ok(())
    }

    /// No draw entry starts left of the canvas.
    fn check_non_negative(store: &ElementStore) -> Result<(), TestCaseError> {
        let result = symmetrize(store);
        for entry in &result.entries {
            prop_assert!(entry.x() >= -0.001, "{} starts at {}", entry.id(), entry.x());
        }
        for connector in &result.connectors {
            prop_assert!(connector.geometry().min_x() >= -0.001);
        }
        prop_assert!(result.offset >= 0.0);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn centering(store in tree_strategy()) {
            check_centering(&store)?;
        }

        #[test]
        fn non_negative(store in tree_strategy()) {
            check_non_negative(&store)?;
        }
    }
}
