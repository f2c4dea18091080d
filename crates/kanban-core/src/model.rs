#![forbid(unsafe_code)]

//! Board model: boards, columns, cards, and viewport visibility.
//!
//! List order is authoritative. `Column::cards` and `Board::columns` define
//! display order; the `position` fields are a denormalized mirror that is
//! only rewritten when a drop is persisted.
//!
//! # Invariants
//!
//! 1. A card id appears in exactly one column's `cards` list.
//! 2. Geometry fields are only touched by coordinate-registry updates.
//! 3. Ordering is only touched by the drag session and by external
//!    create/delete operations (board reloads).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Coordinates;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw storage id.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw storage id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Stable identifier of a board.
    BoardId,
    "board"
);
id_type!(
    /// Stable identifier of a column.
    ColumnId,
    "col"
);
id_type!(
    /// Stable identifier of a card.
    CardId,
    "card"
);

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Indices a virtualized list currently has mounted.
///
/// Only mounted items have fresh geometry; anything outside this set keeps
/// whatever box it was last laid out with and must not be hit-tested.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportState {
    visible: BTreeSet<usize>,
}

impl ViewportState {
    /// Viewport with the given visible indices.
    #[must_use]
    pub fn new(visible: impl IntoIterator<Item = usize>) -> Self {
        Self {
            visible: visible.into_iter().collect(),
        }
    }

    /// Viewport with every index in `start..end` mounted.
    #[must_use]
    pub fn range(start: usize, end: usize) -> Self {
        Self::new(start..end)
    }

    /// Whether the item at `index` is mounted.
    #[inline]
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }

    /// Mounted indices in ascending order.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    /// Persisted position within the owning column.
    pub position: u32,
    pub description: Option<String>,
    /// Storage key of the cover image, if any.
    pub cover: Option<String>,
    #[serde(skip)]
    pub coordinates: Coordinates,
}

impl Card {
    /// Create a card with no geometry yet.
    #[must_use]
    pub fn new(id: CardId, title: impl Into<String>, position: u32) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            description: None,
            cover: None,
            coordinates: Coordinates::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }
}

/// A column and its ordered cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    /// Persisted position on the board.
    pub position: u32,
    /// Accent color as packed ARGB.
    pub color: u32,
    pub cards: Vec<Card>,
    /// Outer box (header + body).
    #[serde(skip)]
    pub coordinates: Coordinates,
    #[serde(skip)]
    pub header_coordinates: Coordinates,
    /// Scrollable card list.
    #[serde(skip)]
    pub body_coordinates: Coordinates,
    /// Visible card indices of the nested virtualized list.
    #[serde(skip)]
    pub viewport: ViewportState,
}

impl Column {
    /// Create an empty column with no geometry yet.
    #[must_use]
    pub fn new(id: ColumnId, name: impl Into<String>, position: u32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            color: 0xFF9E_9E9E,
            cards: Vec::new(),
            coordinates: Coordinates::default(),
            header_coordinates: Coordinates::default(),
            body_coordinates: Coordinates::default(),
            viewport: ViewportState::default(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    /// Current list index of a card in this column.
    #[must_use]
    pub fn card_index(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }
}

/// A board and its ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(skip)]
    pub coordinates: Coordinates,
    /// Visible column indices of the horizontal virtualized list.
    #[serde(skip)]
    pub viewport: ViewportState,
}

impl Board {
    /// Create an empty board with no geometry yet.
    #[must_use]
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: Vec::new(),
            coordinates: Coordinates::default(),
            viewport: ViewportState::default(),
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Current list index of a column.
    #[must_use]
    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| column.id == id)
    }

    /// Locate a card as `(column index, card index)`.
    #[must_use]
    pub fn locate_card(&self, id: CardId) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(col_idx, column)| column.card_index(id).map(|card_idx| (col_idx, card_idx)))
    }

    /// Every card id in display order, column by column.
    pub fn card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter().map(|card| card.id))
    }

    /// Check the one-column-per-card invariant.
    #[must_use]
    pub fn containment_report(&self) -> ContainmentReport {
        let mut seen = BTreeSet::new();
        let mut duplicated = BTreeSet::new();
        for id in self.card_ids() {
            if !seen.insert(id) {
                duplicated.insert(id);
            }
        }
        ContainmentReport {
            card_count: seen.len(),
            duplicated: duplicated.into_iter().collect(),
        }
    }
}

/// Result of [`Board::containment_report`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainmentReport {
    /// Number of distinct card ids on the board.
    pub card_count: usize,
    /// Ids found in more than one slot.
    pub duplicated: Vec<CardId>,
}

impl ContainmentReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.duplicated.is_empty()
    }
}

/// A lookup result pairing an element with its index in the owning list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedItem<T> {
    pub item: T,
    pub index: usize,
}

impl<T> IndexedItem<T> {
    #[inline]
    pub const fn new(item: T, index: usize) -> Self {
        Self { item, index }
    }

    /// Map the item, keeping the index.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> IndexedItem<U> {
        IndexedItem {
            item: f(self.item),
            index: self.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(BoardId::new(1), "Sprint").with_columns(vec![
            Column::new(ColumnId::new(10), "Todo", 0)
                .with_color(0xFF42_A5F5)
                .with_cards(vec![
                    Card::new(CardId::new(100), "a", 0).with_description("first"),
                    Card::new(CardId::new(101), "b", 1).with_cover("covers/b.png"),
                ]),
            Column::new(ColumnId::new(11), "Done", 1)
                .with_cards(vec![Card::new(CardId::new(102), "c", 0)]),
        ])
    }

    #[test]
    fn lookups_follow_list_order() {
        let board = board();
        assert_eq!(board.column_index(ColumnId::new(11)), Some(1));
        assert_eq!(board.column_index(ColumnId::new(99)), None);
        assert_eq!(board.locate_card(CardId::new(101)), Some((0, 1)));
        assert_eq!(board.locate_card(CardId::new(102)), Some((1, 0)));
        assert_eq!(board.locate_card(CardId::new(7)), None);
    }

    #[test]
    fn containment_report_flags_duplicates() {
        let mut board = board();
        assert!(board.containment_report().is_ok());
        assert_eq!(board.containment_report().card_count, 3);

        let dup = board.columns[0].cards[0].clone();
        board.columns[1].cards.push(dup);
        let report = board.containment_report();
        assert!(!report.is_ok());
        assert_eq!(report.duplicated, vec![CardId::new(100)]);
    }

    #[test]
    fn content_builders_fill_optional_fields() {
        let board = board();
        let todo = &board.columns[0];
        assert_eq!(todo.color, 0xFF42_A5F5);
        assert_eq!(board.columns[1].color, 0xFF9E_9E9E);
        assert_eq!(todo.cards[0].description.as_deref(), Some("first"));
        assert_eq!(todo.cards[0].cover, None);
        assert_eq!(todo.cards[1].cover.as_deref(), Some("covers/b.png"));
        assert_eq!(todo.cards[1].description, None);
    }

    #[test]
    fn viewport_membership() {
        let viewport = ViewportState::range(2, 5);
        assert!(!viewport.is_visible(1));
        assert!(viewport.is_visible(2));
        assert!(viewport.is_visible(4));
        assert!(!viewport.is_visible(5));
        assert_eq!(viewport.visible_indices().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(ViewportState::default().is_empty());
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(ColumnId::new(3).to_string(), "col-3");
        assert_eq!(CardId::new(4).to_string(), "card-4");
        assert_eq!(BoardId::new(5).get(), 5);
    }

    #[test]
    fn indexed_item_map_keeps_index() {
        let item = IndexedItem::new("x", 3).map(str::len);
        assert_eq!(item, IndexedItem::new(1, 3));
    }
}
