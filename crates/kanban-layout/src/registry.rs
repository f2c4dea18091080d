#![forbid(unsafe_code)]

//! Coordinate registry: applying layout batches to a board.
//!
//! Every function here is a pure `(board, batch) -> board` step. It walks one
//! collection and, for each element whose id is a key in the batch, replaces
//! only that element's geometry (or viewport) field. Ordering and all other
//! fields are untouched.
//!
//! # Failure Modes
//!
//! None. Batch entries whose id is not on the board (the element was removed
//! concurrently, or belongs to another board) are dropped silently.

use std::collections::HashMap;
use std::hash::BuildHasher;

use kanban_core::geometry::Coordinates;
use kanban_core::model::{Board, CardId, Column, ColumnId, ViewportState};
use rustc_hash::FxHashMap;

/// Convenience batch type for callers assembling updates by hand.
pub type CoordinateBatch<K> = FxHashMap<K, Coordinates>;

/// Replace the board viewport box.
#[must_use]
pub fn set_board_coordinates(mut board: Board, coordinates: Coordinates) -> Board {
    board.coordinates = coordinates;
    board
}

/// Replace outer boxes of the columns named in `batch`.
#[must_use]
pub fn set_column_coordinates<S: BuildHasher>(
    mut board: Board,
    batch: &HashMap<ColumnId, Coordinates, S>,
) -> Board {
    for column in &mut board.columns {
        if let Some(c) = batch.get(&column.id) {
            column.coordinates = *c;
        }
    }
    board
}

/// Replace header boxes of the columns named in `batch`.
#[must_use]
pub fn set_column_header_coordinates<S: BuildHasher>(
    mut board: Board,
    batch: &HashMap<ColumnId, Coordinates, S>,
) -> Board {
    for column in &mut board.columns {
        if let Some(c) = batch.get(&column.id) {
            column.header_coordinates = *c;
        }
    }
    board
}

/// Replace scrollable body boxes of the columns named in `batch`.
#[must_use]
pub fn set_column_body_coordinates<S: BuildHasher>(
    mut board: Board,
    batch: &HashMap<ColumnId, Coordinates, S>,
) -> Board {
    for column in &mut board.columns {
        if let Some(c) = batch.get(&column.id) {
            column.body_coordinates = *c;
        }
    }
    board
}

/// Replace boxes of the cards named in `batch`, wherever they live.
#[must_use]
pub fn set_card_coordinates<S: BuildHasher>(
    mut board: Board,
    batch: &HashMap<CardId, Coordinates, S>,
) -> Board {
    if batch.is_empty() {
        return board;
    }
    for card in board.columns.iter_mut().flat_map(|col| col.cards.iter_mut()) {
        if let Some(c) = batch.get(&card.id) {
            card.coordinates = *c;
        }
    }
    board
}

/// Replace the set of mounted column indices.
#[must_use]
pub fn set_visible_columns(mut board: Board, viewport: ViewportState) -> Board {
    board.viewport = viewport;
    board
}

/// Replace the mounted card indices of the columns named in `batch`.
#[must_use]
pub fn set_visible_cards<S: BuildHasher>(
    mut board: Board,
    batch: &HashMap<ColumnId, ViewportState, S>,
) -> Board {
    for column in &mut board.columns {
        if let Some(viewport) = batch.get(&column.id) {
            column.viewport = viewport.clone();
        }
    }
    board
}

/// Keep the geometry and viewports of `from` for every element that
/// survives into `into` (matched by id).
///
/// Used when a fresh board from the data layer replaces the current one:
/// the UI does not re-report boxes that did not change.
#[must_use]
pub fn carry_over_geometry(from: &Board, mut into: Board) -> Board {
    if from.id != into.id {
        return into;
    }
    into.coordinates = from.coordinates;
    into.viewport = from.viewport.clone();

    let columns: FxHashMap<ColumnId, &Column> =
        from.columns.iter().map(|column| (column.id, column)).collect();
    let cards: FxHashMap<CardId, Coordinates> = from
        .columns
        .iter()
        .flat_map(|column| column.cards.iter())
        .map(|card| (card.id, card.coordinates))
        .collect();

    for column in &mut into.columns {
        if let Some(old) = columns.get(&column.id) {
            column.coordinates = old.coordinates;
            column.header_coordinates = old.header_coordinates;
            column.body_coordinates = old.body_coordinates;
            column.viewport = old.viewport.clone();
        }
        for card in &mut column.cards {
            if let Some(c) = cards.get(&card.id) {
                card.coordinates = *c;
            }
        }
    }
    into
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::model::{BoardId, Card};

    fn board() -> Board {
        Board::new(BoardId::new(1), "b").with_columns(vec![
            Column::new(ColumnId::new(1), "one", 0)
                .with_cards(vec![Card::new(CardId::new(10), "x", 0)]),
            Column::new(ColumnId::new(2), "two", 1)
                .with_cards(vec![Card::new(CardId::new(20), "y", 0)]),
        ])
    }

    #[test]
    fn column_batch_touches_only_named_columns() {
        let mut batch = CoordinateBatch::default();
        batch.insert(ColumnId::new(2), Coordinates::new(110.0, 0.0, 100.0, 400.0));
        let before = board();
        let after = set_column_coordinates(before.clone(), &batch);

        assert_eq!(after.columns[0], before.columns[0]);
        assert_eq!(
            after.columns[1].coordinates,
            Coordinates::new(110.0, 0.0, 100.0, 400.0)
        );
        assert_eq!(after.columns[1].header_coordinates, Coordinates::default());
        assert_eq!(after.columns[1].cards, before.columns[1].cards);
    }

    #[test]
    fn header_and_body_are_independent() {
        let mut header = CoordinateBatch::default();
        header.insert(ColumnId::new(1), Coordinates::new(0.0, 0.0, 100.0, 40.0));
        let mut body = CoordinateBatch::default();
        body.insert(ColumnId::new(1), Coordinates::new(0.0, 40.0, 100.0, 360.0));

        let board = set_column_header_coordinates(board(), &header);
        let board = set_column_body_coordinates(board, &body);
        let col = &board.columns[0];
        assert_eq!(col.header_coordinates.height, 40.0);
        assert_eq!(col.body_coordinates.top(), 40.0);
        assert_eq!(col.coordinates, Coordinates::default());
    }

    #[test]
    fn card_batch_reaches_every_column() {
        let mut batch = CoordinateBatch::default();
        batch.insert(CardId::new(10), Coordinates::new(0.0, 50.0, 100.0, 40.0));
        batch.insert(CardId::new(20), Coordinates::new(110.0, 50.0, 100.0, 40.0));
        let board = set_card_coordinates(board(), &batch);
        assert_eq!(board.columns[0].cards[0].coordinates.top(), 50.0);
        assert_eq!(board.columns[1].cards[0].coordinates.left(), 110.0);
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let mut batch = CoordinateBatch::default();
        batch.insert(CardId::new(999), Coordinates::new(1.0, 1.0, 1.0, 1.0));
        let before = board();
        assert_eq!(set_card_coordinates(before.clone(), &batch), before);

        let mut cols = CoordinateBatch::default();
        cols.insert(ColumnId::new(999), Coordinates::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(set_column_coordinates(before.clone(), &cols), before);
    }

    #[test]
    fn viewport_updates() {
        let board = set_visible_columns(board(), ViewportState::range(0, 2));
        assert!(board.viewport.is_visible(1));

        let mut batch = FxHashMap::default();
        batch.insert(ColumnId::new(2), ViewportState::range(0, 1));
        let board = set_visible_cards(board, &batch);
        assert!(board.columns[0].viewport.is_empty());
        assert!(board.columns[1].viewport.is_visible(0));
    }

    #[test]
    fn board_box_replaced_wholesale() {
        let board = set_board_coordinates(board(), Coordinates::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(board.coordinates.width, 800.0);
        assert_eq!(board.columns.len(), 2);
    }

    #[test]
    fn reload_keeps_known_geometry() {
        let mut cols = CoordinateBatch::default();
        cols.insert(ColumnId::new(1), Coordinates::new(0.0, 0.0, 100.0, 400.0));
        let mut cards = CoordinateBatch::default();
        cards.insert(CardId::new(20), Coordinates::new(110.0, 50.0, 100.0, 40.0));
        let old = set_card_coordinates(set_column_coordinates(board(), &cols), &cards);
        let old = set_visible_columns(old, ViewportState::range(0, 2));

        // Card 20 moved to column 1 server-side, card 30 is new.
        let fresh = Board::new(BoardId::new(1), "b").with_columns(vec![
            Column::new(ColumnId::new(1), "one", 0).with_cards(vec![
                Card::new(CardId::new(20), "y", 0),
                Card::new(CardId::new(30), "z", 1),
            ]),
        ]);
        let merged = carry_over_geometry(&old, fresh);

        assert!(merged.viewport.is_visible(1));
        assert_eq!(merged.columns[0].coordinates.height, 400.0);
        assert_eq!(merged.columns[0].cards[0].coordinates.left(), 110.0);
        assert_eq!(merged.columns[0].cards[1].coordinates, Coordinates::default());
    }

    #[test]
    fn reload_of_other_board_starts_clean() {
        let old = set_visible_columns(board(), ViewportState::range(0, 2));
        let other = Board::new(BoardId::new(2), "other");
        assert!(carry_over_geometry(&old, other).viewport.is_empty());
    }
}
