//! Connector shape decisions and geometry.
//!
//! Every child is joined to its parent by a straight line, or, for leaves
//! holding more than one word, by a triangle whose base spans the leaf's text.

use syntree_core::{
    element::{Element, ElementId},
    geometry::Point,
};

use super::canvas::Rows;
use crate::config::LeafStyle;

/// Indents closer than this are considered aligned.
const ALIGN_EPSILON: f32 = 0.01;

/// Which pass the connectors are planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Packed,
    Symmetric,
}

/// Horizontal box an element is drawn centered in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Slot {
    x: f32,
    width: f32,
}

impl Slot {
    pub(super) fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    pub(super) fn x(&self) -> f32 {
        self.x
    }

    pub(super) fn width(&self) -> f32 {
        self.width
    }

    pub(super) fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorShape {
    Line,
    Triangle,
}

/// Endpoints of a connector in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectorGeometry {
    /// From the parent's bottom center to the child's top center.
    Line { from: Point, to: Point },
    /// Apex under the parent, base along the top of the child's text.
    Triangle {
        apex: Point,
        base_left: Point,
        base_right: Point,
    },
}

impl ConnectorGeometry {
    /// Width of a triangle's base, `None` for lines.
    pub fn base_width(&self) -> Option<f32> {
        match self {
            Self::Line { .. } => None,
            Self::Triangle {
                base_left,
                base_right,
                ..
            } => Some(base_right.x() - base_left.x()),
        }
    }

    /// Smallest x coordinate of any point.
    pub fn min_x(&self) -> f32 {
        match self {
            Self::Line { from, to } => from.x().min(to.x()),
            Self::Triangle {
                apex, base_left, ..
            } => apex.x().min(base_left.x()),
        }
    }

    fn translate_x(self, dx: f32) -> Self {
        match self {
            Self::Line { from, to } => Self::Line {
                from: from.translate_x(dx),
                to: to.translate_x(dx),
            },
            Self::Triangle {
                apex,
                base_left,
                base_right,
            } => Self::Triangle {
                apex: apex.translate_x(dx),
                base_left: base_left.translate_x(dx),
                base_right: base_right.translate_x(dx),
            },
        }
    }
}

/// A drawn edge between a child and its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    child: ElementId,
    parent: ElementId,
    shape: ConnectorShape,
    geometry: ConnectorGeometry,
}

impl Connector {
    /// Computes the geometry of `shape` between the two slots.
    ///
    /// `text_width` is the measured width of the child's label; it sets the
    /// triangle base.
    pub(super) fn new(
        child: &Element,
        parent: &Element,
        shape: ConnectorShape,
        child_slot: Slot,
        parent_slot: Slot,
        text_width: f32,
        rows: &Rows,
    ) -> Self {
        let attach = Point::new(parent_slot.center(), rows.bottom(parent.level()));
        let top = Point::new(child_slot.center(), rows.top(child.level()));

        let geometry = match shape {
            ConnectorShape::Line => ConnectorGeometry::Line {
                from: attach,
                to: top,
            },
            ConnectorShape::Triangle => ConnectorGeometry::Triangle {
                apex: attach,
                base_left: top.translate_x(-text_width / 2.0),
                base_right: top.translate_x(text_width / 2.0),
            },
        };

        Self {
            child: child.id(),
            parent: parent.id(),
            shape,
            geometry,
        }
    }

    pub(super) fn translate_x(mut self, dx: f32) -> Self {
        self.geometry = self.geometry.translate_x(dx);
        self
    }

    pub fn child(&self) -> ElementId {
        self.child
    }

    pub fn parent(&self) -> ElementId {
        self.parent
    }

    pub fn shape(&self) -> ConnectorShape {
        self.shape
    }

    pub fn geometry(&self) -> &ConnectorGeometry {
        &self.geometry
    }
}

/// Whether a child's packed indent coincides with its parent's.
pub(super) fn aligned(child_x: f32, parent_x: f32) -> bool {
    (child_x - parent_x).abs() < ALIGN_EPSILON
}

/// Decides how `child` is joined to its parent, `None` meaning not at all.
///
/// The alignment gate of [`LeafStyle::Auto`] only applies in packed mode.
pub(super) fn shape(
    style: LeafStyle,
    mode: Mode,
    child: &Element,
    aligned: bool,
) -> Option<ConnectorShape> {
    if !child.is_leaf() {
        return Some(ConnectorShape::Line);
    }

    let collapse = child.triangle() || child.label().word_count() > 1;
    let gated = match (style, mode) {
        (LeafStyle::Nothing, _) => return None,
        (LeafStyle::Auto, Mode::Packed) => !aligned,
        (LeafStyle::Auto, Mode::Symmetric) | (LeafStyle::Always, _) => false,
    };

    if collapse && !gated {
        Some(ConnectorShape::Triangle)
    } else {
        Some(ConnectorShape::Line)
    }
}
