#![forbid(unsafe_code)]

//! Board state and its reducer.
//!
//! [`BoardState::reduce`] is the single place where the board changes. It
//! consumes a [`BoardAction`] and returns a [`Transition`]: the next state
//! (if anything changed), the drag effect (for drag inputs), and a position
//! snapshot to persist (when a drag session ended).
//!
//! # Invariants
//!
//! 1. `version` increases by one on every transition that yields a state.
//! 2. Every card id appears in exactly one column, after every transition.
//! 3. Geometry actions never reorder anything.

use ahash::AHashMap;
use kanban_core::event::DragInput;
use kanban_core::geometry::Coordinates;
use kanban_core::model::{Board, CardId, ColumnId, ViewportState};
use kanban_layout::registry;

use crate::persistence::{PositionSnapshot, normalize_positions};
use crate::session::{self, DragEffect, DragNoopReason, DragState};

/// Immutable snapshot published to readers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Monotonic change counter.
    pub version: u64,
    pub board: Option<Board>,
    pub drag: DragState,
}

/// Everything that can change a [`BoardState`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    /// Replace the board with fresh data, keeping known geometry.
    LoadBoard(Board),
    SetBoardCoordinates(Coordinates),
    SetColumnCoordinates(AHashMap<ColumnId, Coordinates>),
    SetColumnHeaderCoordinates(AHashMap<ColumnId, Coordinates>),
    SetColumnBodyCoordinates(AHashMap<ColumnId, Coordinates>),
    SetCardCoordinates(AHashMap<CardId, Coordinates>),
    SetVisibleColumns(ViewportState),
    SetVisibleCards(AHashMap<ColumnId, ViewportState>),
    Drag(DragInput),
}

/// Result of [`BoardState::reduce`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// `None` when the action changed nothing.
    pub next: Option<BoardState>,
    /// Present for [`BoardAction::Drag`].
    pub effect: Option<DragEffect>,
    /// Present when a drag session ended.
    pub persist: Option<PositionSnapshot>,
}

impl BoardState {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            version: 0,
            board: Some(board),
            drag: DragState::Idle,
        }
    }

    /// Compute the transition for `action` without mutating `self`.
    #[must_use]
    pub fn reduce(&self, action: BoardAction) -> Transition {
        match action {
            BoardAction::LoadBoard(fresh) => {
                let board = match &self.board {
                    Some(current) => registry::carry_over_geometry(current, fresh),
                    None => fresh,
                };
                // A reload mid-drag keeps the session; the next move
                // re-derives indices by id.
                self.changed(board, self.drag, None, None)
            }
            BoardAction::Drag(input) => self.reduce_drag(input),
            geometry => self.reduce_geometry(geometry),
        }
    }

    fn reduce_geometry(&self, action: BoardAction) -> Transition {
        let Some(board) = self.board.clone() else {
            return Transition::default();
        };
        let board = match action {
            BoardAction::SetBoardCoordinates(c) => registry::set_board_coordinates(board, c),
            BoardAction::SetColumnCoordinates(batch) => {
                registry::set_column_coordinates(board, &*batch)
            }
            BoardAction::SetColumnHeaderCoordinates(batch) => {
                registry::set_column_header_coordinates(board, &*batch)
            }
            BoardAction::SetColumnBodyCoordinates(batch) => {
                registry::set_column_body_coordinates(board, &*batch)
            }
            BoardAction::SetCardCoordinates(batch) => registry::set_card_coordinates(board, &*batch),
            BoardAction::SetVisibleColumns(viewport) => {
                registry::set_visible_columns(board, viewport)
            }
            BoardAction::SetVisibleCards(batch) => registry::set_visible_cards(board, &*batch),
            BoardAction::LoadBoard(_) | BoardAction::Drag(_) => return Transition::default(),
        };
        self.changed(board, self.drag, None, None)
    }

    fn reduce_drag(&self, input: DragInput) -> Transition {
        let Some(board) = self.board.clone() else {
            return Transition {
                effect: Some(DragEffect::Noop {
                    reason: DragNoopReason::BoardMissing,
                }),
                ..Transition::default()
            };
        };
        let step = session::apply(board, self.drag, input);
        if matches!(step.effect, DragEffect::Noop { .. }) {
            return Transition {
                effect: Some(step.effect),
                ..Transition::default()
            };
        }

        let mut board = step.board;
        let persist = step
            .effect
            .is_release()
            .then(|| normalize_positions(&mut board, self.version.wrapping_add(1)));
        debug_assert!(
            board.containment_report().is_ok(),
            "card containment broken after {:?}",
            step.effect
        );
        self.changed(board, step.drag, Some(step.effect), persist)
    }

    fn changed(
        &self,
        board: Board,
        drag: DragState,
        effect: Option<DragEffect>,
        persist: Option<PositionSnapshot>,
    ) -> Transition {
        Transition {
            next: Some(Self {
                version: self.version.wrapping_add(1),
                board: Some(board),
                drag,
            }),
            effect,
            persist,
        }
    }
}
