//! Subtree width calculation.

use log::trace;

use syntree_core::element::{ElementId, ElementStore};

use super::{LabelMeasure, Widths};

/// Computes the footprint width of every subtree.
///
/// A leaf is its padded label width. A node is the sum of its children,
/// unless its own padded label is wider; then every descendant is stretched
/// by the same ratio so the children again sum to the node's width.
pub(super) fn calculate(store: &ElementStore, measure: &LabelMeasure<'_>) -> Widths {
    let mut widths = Widths::with_capacity(store.len());
    subtree_width(store, store.root().id(), measure, &mut widths);
    widths
}

fn subtree_width(
    store: &ElementStore,
    id: ElementId,
    measure: &LabelMeasure<'_>,
    widths: &mut Widths,
) -> f32 {
    let Some(element) = store.get(id) else {
        return 0.0;
    };
    let label_width = measure.padded_width(element);
    let children = store.children(id);

    let width = if children.is_empty() {
        label_width
    } else {
        let sum: f32 = children
            .iter()
            .map(|&child| subtree_width(store, child, measure, widths))
            .sum();
        if label_width > sum {
            trace!(id:% = id, label_width, children_width = sum; "Stretching children to fit label");
            let ratio = label_width / sum;
            for &child in children {
                stretch(store, child, ratio, widths);
            }
            label_width
        } else {
            sum
        }
    };

    widths.insert(id, width);
    width
}

/// Scales `id` and all of its descendants by `ratio`.
fn stretch(store: &ElementStore, id: ElementId, ratio: f32, widths: &mut Widths) {
    if let Some(width) = widths.get_mut(&id) {
        *width *= ratio;
    }
    for &child in store.children(id) {
        stretch(store, child, ratio, widths);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use syntree_core::text::FontSpec;

    use super::*;
    use crate::layout::test_utils::{BrokenMetrics, FixedMetrics, id, sample_store, wide_parent_store};

    fn measure(metrics: &FixedMetrics) -> LabelMeasure<'_> {
        LabelMeasure::new(metrics, FontSpec::new("sans-serif", 10))
    }

    #[test]
    fn test_leaf_width_is_padded() {
        let widths = calculate(&sample_store(), &measure(&FixedMetrics));
        assert_approx_eq!(f32, widths[&id(2)], 40.0);
        assert_approx_eq!(f32, widths[&id(4)], 110.0);
    }

    #[test]
    fn test_node_width_is_children_sum() {
        let widths = calculate(&sample_store(), &measure(&FixedMetrics));
        assert_approx_eq!(f32, widths[&id(1)], 40.0);
        assert_approx_eq!(f32, widths[&id(3)], 110.0);
        assert_approx_eq!(f32, widths[&id(0)], 150.0);
    }

    #[test]
    fn test_wide_label_stretches_children() {
        let widths = calculate(&wide_parent_store(), &measure(&FixedMetrics));
        // "Determiner" padded is 110, its only leaf "a" is 20
        assert_approx_eq!(f32, widths[&id(1)], 110.0);
        assert_approx_eq!(f32, widths[&id(2)], 110.0);
        assert_approx_eq!(f32, widths[&id(0)], 110.0 + 40.0);
    }

    #[test]
    fn test_stretch_preserves_fractions() {
        use syntree_core::element::Element;

        let store = ElementStore::new(vec![
            Element::node(id(0), None, 0, "Sentence"),
            Element::leaf(id(1), Some(id(0)), 1, "a"),
            Element::leaf(id(2), Some(id(0)), 1, "abc"),
        ])
        .unwrap();
        let widths = calculate(&store, &measure(&FixedMetrics));

        // children 20 + 40 stretched to 90
        assert_approx_eq!(f32, widths[&id(0)], 90.0);
        assert_approx_eq!(f32, widths[&id(1)], 30.0, epsilon = 0.001);
        assert_approx_eq!(f32, widths[&id(2)], 60.0, epsilon = 0.001);
    }

    #[test]
    fn test_stretch_recurses_into_grandchildren() {
        use syntree_core::element::Element;

        let store = ElementStore::new(vec![
            Element::node(id(0), None, 0, "VeryLongLabel"),
            Element::node(id(1), Some(id(0)), 1, "X"),
            Element::leaf(id(2), Some(id(1)), 2, "a"),
            Element::leaf(id(3), Some(id(1)), 2, "b"),
        ])
        .unwrap();
        let widths = calculate(&store, &measure(&FixedMetrics));

        assert_approx_eq!(f32, widths[&id(0)], 140.0);
        assert_approx_eq!(f32, widths[&id(1)], 140.0);
        assert_approx_eq!(f32, widths[&id(2)] + widths[&id(3)], 140.0, epsilon = 0.001);
    }

    #[test]
    fn test_zero_metrics_clamp() {
        let metrics = BrokenMetrics;
        let measure = LabelMeasure::new(&metrics, FontSpec::new("sans-serif", 0));
        let widths = calculate(&sample_store(), &measure);
        assert_approx_eq!(f32, widths[&id(2)], 1.0);
        assert_approx_eq!(f32, widths[&id(0)], 2.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use syntree_core::text::FontSpec;

    use super::*;
    use crate::layout::test_utils::{FixedMetrics, tree_strategy};

    // ===================
    // Property Test Functions
    // ===================

    /// A node is never narrower than its children combined.
    fn check_node_covers_children(store: &ElementStore) -> Result<(), TestCaseError> {
        let measure = LabelMeasure::new(&FixedMetrics, FontSpec::new("sans-serif", 10));
        let widths = calculate(store, &measure);

        for element in store.iter() {
            let children = store.children(element.id());
            if children.is_empty() {
                continue;
            }
            let sum: f32 = children.iter().map(|child| widths[child]).sum();
            let width = widths[&element.id()];
            prop_assert!(
                width + 0.01 >= sum,
                "{} is {width} wide but its children need {sum}",
                element.id()
            );
        }
        Ok(())
    }

    /// Every element gets a width of at least one pixel.
    fn check_widths_positive(store: &ElementStore) -> Result<(), TestCaseError> {
        let measure = LabelMeasure::new(&FixedMetrics, FontSpec::new("sans-serif", 10));
        let widths = calculate(store, &measure);

        prop_assert_eq!(widths.len(), store.len());
        prop_assert!(widths.values().all(|width| *width >= 1.0));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn node_covers_children(store in tree_strategy()) {
            check_node_covers_children(&store)?;
        }

        #[test]
        fn widths_positive(store in tree_strategy()) {
            check_widths_positive(&store)?;
        }
    }
}
