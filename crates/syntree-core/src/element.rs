//! Tree elements and the arena that owns them.
//!
//! A syntax tree is stored flat: [`ElementStore`] owns every [`Element`] in
//! parse order and derives the parent/children relations once, on
//! construction. Elements refer to each other only through [`ElementId`], so
//! no element owns another.
//!
//! Construction validates the structure and fails with a [`StructureError`]
//! before any layout work happens.
//!
//! # Example
//!
//! ```
//! # use syntree_core::element::{Element, ElementId, ElementStore};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let s = ElementId::new(0);
//! let np = ElementId::new(1);
//! let store = ElementStore::new(vec![
//!     Element::node(s, None, 0, "S"),
//!     Element::node(np, Some(s), 1, "NP"),
//!     Element::leaf(ElementId::new(2), Some(np), 2, "Kim"),
//! ])?;
//!
//! assert_eq!(store.root().content(), "S");
//! assert_eq!(store.level_count(), 3);
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::label::Label;

/// Identifier of an element, unique within one [`ElementStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an element may have children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A phrase or category label with one or more children.
    Node,
    /// Terminal text without children.
    Leaf,
}

/// One node or leaf of a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: ElementId,
    parent: Option<ElementId>,
    level: usize,
    content: String,
    kind: ElementKind,
    triangle: bool,
}

impl Element {
    /// Creates a node element.
    pub fn node(
        id: ElementId,
        parent: Option<ElementId>,
        level: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent,
            level,
            content: content.into(),
            kind: ElementKind::Node,
            triangle: false,
        }
    }

    /// Creates a leaf element.
    pub fn leaf(
        id: ElementId,
        parent: Option<ElementId>,
        level: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: ElementKind::Leaf,
            ..Self::node(id, parent, level, content)
        }
    }

    /// Requests a triangle connector regardless of the word count.
    pub fn with_triangle(mut self, triangle: bool) -> Self {
        self.triangle = triangle;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Returns the parent id, or `None` for the root.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Depth from the root; the root is level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Raw content, including markers.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == ElementKind::Leaf
    }

    /// Whether a triangle connector was explicitly requested.
    pub fn triangle(&self) -> bool {
        self.triangle
    }

    /// Returns the display view of the content.
    pub fn label(&self) -> Label<'_> {
        Label::new(&self.content)
    }
}

/// Structural problems detected while building an [`ElementStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("tree has no elements")]
    Empty,

    #[error("element id {0} is used more than once")]
    DuplicateId(ElementId),

    #[error("tree has no root element")]
    NoRoot,

    #[error("tree has more than one root: {first} and {second}")]
    MultipleRoots { first: ElementId, second: ElementId },

    #[error("element {child} refers to missing parent {parent}")]
    DanglingParent { child: ElementId, parent: ElementId },

    #[error("parent chain of element {0} never reaches the root")]
    Cycle(ElementId),

    #[error("element {id} is at level {actual}, expected level {expected}")]
    LevelMismatch {
        id: ElementId,
        expected: usize,
        actual: usize,
    },

    #[error("leaf {0} has children")]
    LeafWithChildren(ElementId),
}

/// Arena of tree elements with derived parent/children indexes.
///
/// Iteration follows insertion order, which is the order the parser
/// encountered the elements. Children of a node keep that order, which is
/// their left-to-right drawing order.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: IndexMap<ElementId, Element>,
    children: HashMap<ElementId, Vec<ElementId>>,
    root: ElementId,
    max_level: usize,
}

impl ElementStore {
    /// Validates `elements` and builds the store.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the elements do not form a single
    /// rooted tree whose levels increase by exactly one from parent to child.
    pub fn new(elements: Vec<Element>) -> Result<Self, StructureError> {
        if elements.is_empty() {
            return Err(StructureError::Empty);
        }

        let mut map = IndexMap::with_capacity(elements.len());
        for element in elements {
            let id = element.id;
            if map.insert(id, element).is_some() {
                return Err(StructureError::DuplicateId(id));
            }
        }

        let root = find_root(&map)?;
        check_parents(&map)?;
        check_levels(&map)?;

        let mut children: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
        for element in map.values() {
            if let Some(parent) = element.parent {
                if map[&parent].is_leaf() {
                    return Err(StructureError::LeafWithChildren(parent));
                }
                children.entry(parent).or_default().push(element.id);
            }
        }

        let max_level = map.values().map(Element::level).max().unwrap_or(0);
        debug!(elements = map.len(), max_level; "Element store built");

        Ok(Self {
            elements: map,
            children,
            root,
            max_level,
        })
    }

    /// Returns the element with the given id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Returns the root element.
    pub fn root(&self) -> &Element {
        &self.elements[&self.root]
    }

    /// Returns the ids of the children of `id` in left-to-right order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the children of `id` in left-to-right order.
    pub fn children_of(&self, id: ElementId) -> impl Iterator<Item = &Element> {
        self.children(id).iter().map(|child| &self.elements[child])
    }

    /// Returns the parent element of `id`, if any.
    pub fn parent(&self, id: ElementId) -> Option<&Element> {
        self.get(id)
            .and_then(Element::parent)
            .and_then(|parent| self.get(parent))
    }

    /// Iterates over all elements in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Iterates over the elements of one level in store order.
    pub fn at_level(&self, level: usize) -> impl Iterator<Item = &Element> {
        self.iter().filter(move |element| element.level == level)
    }

    /// Deepest level present in the tree.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Number of levels (rows) in the tree.
    pub fn level_count(&self) -> usize {
        self.max_level + 1
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn find_root(map: &IndexMap<ElementId, Element>) -> Result<ElementId, StructureError> {
    let mut roots = map.values().filter(|e| e.parent.is_none()).map(|e| e.id);
    let first = roots.next().ok_or(StructureError::NoRoot)?;
    if let Some(second) = roots.next() {
        return Err(StructureError::MultipleRoots { first, second });
    }
    Ok(first)
}

/// Checks that every parent exists and that every chain reaches the root.
fn check_parents(map: &IndexMap<ElementId, Element>) -> Result<(), StructureError> {
    for element in map.values() {
        match element.parent {
            Some(parent) if !map.contains_key(&parent) => {
                return Err(StructureError::DanglingParent {
                    child: element.id,
                    parent,
                });
            }
            _ => {}
        }
    }

    for element in map.values() {
        let mut current = element;
        let mut steps = 0;
        while let Some(parent) = current.parent {
            steps += 1;
            if steps > map.len() {
                return Err(StructureError::Cycle(element.id));
            }
            current = &map[&parent];
        }
    }
    Ok(())
}

fn check_levels(map: &IndexMap<ElementId, Element>) -> Result<(), StructureError> {
    for element in map.values() {
        let expected = element.parent.map_or(0, |parent| map[&parent].level + 1);
        if element.level != expected {
            return Err(StructureError::LevelMismatch {
                id: element.id,
                expected,
                actual: element.level,
            });
        }
    }
    Ok(())
}
