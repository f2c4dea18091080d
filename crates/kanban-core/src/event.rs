#![forbid(unsafe_code)]

//! Input events consumed by the drag engine.
//!
//! The rendering layer produces two streams:
//!
//! - [`LayoutEvent`]: "element X was laid out at box B", one per mounted
//!   element per layout pass. High frequency; routed through the update
//!   coalescer before touching board state.
//! - [`DragInput`]: pointer gesture lifecycle. Applied in call order.

use serde::{Deserialize, Serialize};

use crate::geometry::{Coordinates, Point};
use crate::model::{CardId, ColumnId};

/// Kind of element a layout event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Board,
    Column,
    ColumnHeader,
    ColumnBody,
    Card,
}

/// The element a layout event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LayoutElement {
    Board,
    Column(ColumnId),
    ColumnHeader(ColumnId),
    ColumnBody(ColumnId),
    Card(CardId),
}

impl LayoutElement {
    #[must_use]
    pub const fn kind(self) -> ElementKind {
        match self {
            Self::Board => ElementKind::Board,
            Self::Column(_) => ElementKind::Column,
            Self::ColumnHeader(_) => ElementKind::ColumnHeader,
            Self::ColumnBody(_) => ElementKind::ColumnBody,
            Self::Card(_) => ElementKind::Card,
        }
    }
}

/// One layout observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutEvent {
    pub element: LayoutElement,
    pub coordinates: Coordinates,
}

impl LayoutEvent {
    #[must_use]
    pub const fn new(element: LayoutElement, coordinates: Coordinates) -> Self {
        Self {
            element,
            coordinates,
        }
    }
}

/// Pointer drag lifecycle as delivered by the gesture layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum DragInput {
    /// Pointer pressed and held at an absolute position.
    Start(Point),
    /// Pointer moved by a delta since the previous input. `None` re-runs the
    /// placement with the last known offset (after a list mutation changed
    /// layout without new pointer input).
    Move(Option<Point>),
    /// Pointer released.
    End,
    /// Gesture aborted by the host.
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_kinds() {
        assert_eq!(LayoutElement::Board.kind(), ElementKind::Board);
        assert_eq!(
            LayoutElement::ColumnHeader(ColumnId::new(1)).kind(),
            ElementKind::ColumnHeader
        );
        assert_eq!(LayoutElement::Card(CardId::new(1)).kind(), ElementKind::Card);
    }
}
