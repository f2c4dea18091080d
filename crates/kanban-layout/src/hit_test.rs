#![forbid(unsafe_code)]

//! Hit testing against registered geometry.
//!
//! Columns are tested horizontally, cards vertically within their column.
//! Only items the virtualized list currently has mounted take part: an
//! unmounted item keeps its last box, which no longer describes anything on
//! screen.
//!
//! # Invariants
//!
//! 1. A match is the first item in list order whose range contains the
//!    coordinate (edges inclusive).
//! 2. The returned index is the item's index in the list as passed in,
//!    re-derived from its id rather than from iteration position.
//! 3. A coordinate in a gap between boxes matches nothing.

use kanban_core::model::{Card, Column, IndexedItem, ViewportState};

/// Find the mounted column whose horizontal range contains `x`.
#[must_use]
pub fn find_column_at<'a>(
    x: f32,
    columns: &'a [Column],
    visible: &ViewportState,
) -> Option<IndexedItem<&'a Column>> {
    let column = columns
        .iter()
        .enumerate()
        .filter(|(index, _)| visible.is_visible(*index))
        .map(|(_, column)| column)
        .find(|column| column.coordinates.contains_x(x))?;
    let index = columns.iter().position(|c| c.id == column.id)?;
    Some(IndexedItem::new(column, index))
}

/// Find the mounted card of `column` whose vertical range contains `y`.
#[must_use]
pub fn find_card_at(column: &Column, y: f32) -> Option<IndexedItem<&Card>> {
    let card = column
        .cards
        .iter()
        .enumerate()
        .filter(|(index, _)| column.viewport.is_visible(*index))
        .map(|(_, card)| card)
        .find(|card| card.coordinates.contains_y(y))?;
    let index = column.card_index(card.id)?;
    Some(IndexedItem::new(card, index))
}

/// Whether `y` falls on the column's header (drag-by-header).
#[must_use]
pub fn is_header_pressed(column: &Column, y: f32) -> bool {
    column.header_coordinates.contains_y(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::geometry::Coordinates;
    use kanban_core::model::{CardId, ColumnId};

    fn column(id: u64, x: f32) -> Column {
        let mut column = Column::new(ColumnId::new(id), format!("c{id}"), 0);
        column.coordinates = Coordinates::new(x, 0.0, 100.0, 500.0);
        column.header_coordinates = Coordinates::new(x, 0.0, 100.0, 40.0);
        column
    }

    fn with_cards(mut column: Column, tops: &[f32]) -> Column {
        column.cards = tops
            .iter()
            .enumerate()
            .map(|(i, top)| {
                let mut card = Card::new(CardId::new(100 + i as u64), "card", i as u32);
                card.coordinates = Coordinates::new(column.coordinates.left(), *top, 100.0, 40.0);
                card
            })
            .collect();
        column.viewport = ViewportState::range(0, tops.len());
        column
    }

    #[test]
    fn finds_column_containing_x() {
        let columns = vec![column(1, 0.0), column(2, 110.0), column(3, 220.0)];
        let visible = ViewportState::range(0, 3);

        let hit = find_column_at(150.0, &columns, &visible).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.item.id, ColumnId::new(2));

        // Right edge is inclusive.
        assert_eq!(find_column_at(100.0, &columns, &visible).unwrap().index, 0);
    }

    #[test]
    fn gap_between_columns_matches_nothing() {
        let columns = vec![column(1, 0.0), column(2, 110.0)];
        let visible = ViewportState::range(0, 2);
        assert!(find_column_at(105.0, &columns, &visible).is_none());
    }

    #[test]
    fn unmounted_columns_are_ignored() {
        // Column 0 scrolled off screen but still holds its stale box.
        let columns = vec![column(1, 0.0), column(2, 0.0)];
        let visible = ViewportState::new([1]);
        let hit = find_column_at(50.0, &columns, &visible).unwrap();
        assert_eq!(hit.item.id, ColumnId::new(2));
        assert_eq!(hit.index, 1);

        assert!(find_column_at(50.0, &columns, &ViewportState::default()).is_none());
    }

    #[test]
    fn finds_card_containing_y() {
        let column = with_cards(column(1, 0.0), &[50.0, 100.0, 150.0]);
        let hit = find_card_at(&column, 120.0).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.item.id, CardId::new(101));
        assert!(find_card_at(&column, 95.0).is_none());
        assert!(find_card_at(&column, 400.0).is_none());
    }

    #[test]
    fn card_visibility_restriction() {
        let mut column = with_cards(column(1, 0.0), &[50.0, 100.0]);
        column.viewport = ViewportState::new([0]);
        assert!(find_card_at(&column, 120.0).is_none());
        assert_eq!(find_card_at(&column, 60.0).unwrap().index, 0);
    }

    #[test]
    fn header_classification() {
        let column = column(1, 0.0);
        assert!(is_header_pressed(&column, 0.0));
        assert!(is_header_pressed(&column, 40.0));
        assert!(!is_header_pressed(&column, 41.0));
    }
}
