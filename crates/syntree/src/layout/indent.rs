//! Packed, left-aligned indent assignment.

use syntree_core::element::ElementStore;

use super::{Indents, Widths};

/// Sweeps each level left to right, placing every element at the running x
/// of its level but never left of its parent.
pub(super) fn assign(store: &ElementStore, widths: &Widths) -> Indents {
    let mut indents = Indents::with_capacity(store.len());

    for level in 0..store.level_count() {
        let mut x = 0.0_f32;
        for element in store.at_level(level) {
            let parent_indent = element
                .parent()
                .and_then(|parent| indents.get(&parent))
                .copied()
                .unwrap_or(0.0);
            x = x.max(parent_indent);
            indents.insert(element.id(), x);
            x += widths[&element.id()];
        }
    }

    indents
}
