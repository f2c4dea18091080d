#![no_main]

use ahash::AHashMap;
use arbitrary::Arbitrary;
use kanban_core::event::DragInput;
use kanban_core::geometry::{Coordinates, Point};
use kanban_core::model::{Board, BoardId, Card, CardId, Column, ColumnId, ViewportState};
use kanban_runtime::{BoardAction, BoardState};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Start { x: i16, y: i16 },
    Move { dx: i8, dy: i8 },
    Recompute,
    End,
    Cancel,
    /// Shift one card's box, as a late layout report would.
    Relayout { card: u8, dy: i8 },
    /// Unmount the columns from index `from` on.
    Unmount { from: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    cards_per_column: [u8; 4],
    ops: Vec<Op>,
}

fn board(cards_per_column: &[u8; 4]) -> Board {
    let mut next = 0u64;
    let columns = cards_per_column
        .iter()
        .enumerate()
        .map(|(ci, n)| {
            let x = ci as f32 * 110.0;
            let count = usize::from(n % 6);
            let cards = (0..count)
                .map(|k| {
                    next += 1;
                    let mut card = Card::new(CardId::new(next), "c", k as u32);
                    card.coordinates = Coordinates::new(x, 50.0 + k as f32 * 60.0, 100.0, 50.0);
                    card
                })
                .collect();
            let mut column = Column::new(ColumnId::new(ci as u64), "k", ci as u32).with_cards(cards);
            column.coordinates = Coordinates::new(x, 0.0, 100.0, 600.0);
            column.header_coordinates = Coordinates::new(x, 0.0, 100.0, 40.0);
            column.viewport = ViewportState::range(0, count);
            column
        })
        .collect();
    let mut board = Board::new(BoardId::new(1), "fuzz").with_columns(columns);
    board.viewport = ViewportState::range(0, 4);
    board
}

fuzz_target!(|input: Input| {
    let board = board(&input.cards_per_column);
    let card_count = board.card_ids().count();
    let mut state = BoardState::new(board);

    for op in input.ops.into_iter().take(256) {
        let action = match op {
            Op::Start { x, y } => {
                BoardAction::Drag(DragInput::Start(Point::new(f32::from(x), f32::from(y))))
            }
            Op::Move { dx, dy } => BoardAction::Drag(DragInput::Move(Some(Point::new(
                f32::from(dx),
                f32::from(dy),
            )))),
            Op::Recompute => BoardAction::Drag(DragInput::Move(None)),
            Op::End => BoardAction::Drag(DragInput::End),
            Op::Cancel => BoardAction::Drag(DragInput::Cancel),
            Op::Relayout { card, dy } => {
                let mut batch = AHashMap::new();
                let id = CardId::new(u64::from(card % 24) + 1);
                batch.insert(id, Coordinates::new(0.0, f32::from(dy) * 4.0, 100.0, 50.0));
                BoardAction::SetCardCoordinates(batch)
            }
            Op::Unmount { from } => {
                BoardAction::SetVisibleColumns(ViewportState::range(0, usize::from(from % 5)))
            }
        };
        if let Some(next) = state.reduce(action).next {
            state = next;
        }

        // Post-conditions that must always hold:
        let board = state.board.as_ref().expect("board stays loaded");
        let report = board.containment_report();
        assert!(report.is_ok(), "duplicated cards: {:?}", report.duplicated);
        assert_eq!(report.card_count, card_count, "card lost");
        assert_eq!(board.columns.len(), 4, "column lost");
    }
});

