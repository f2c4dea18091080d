#![forbid(unsafe_code)]

//! Drag session state machine.
//!
//! ```text
//! Idle --start on header--> Column --end/cancel--> Idle
//!   \---start on card-----> Card   --end/cancel--> Idle
//! ```
//!
//! Every step is a pure function of `(board, drag state, input)` that
//! returns the next board, the next drag state, and a [`DragEffect`]
//! describing what happened. Reorders are committed incrementally during
//! [`DragInput::Move`]; a drop only ends the session.
//!
//! # Offsets
//!
//! `offset` is the top-left of the floating copy in board space. It starts
//! so that the copy is centered under the pointer (for columns, the header's
//! center) and accumulates pointer deltas. The dragged item's center is
//! `offset + half its size`.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Nothing under the pointer at start | stays `Idle`, `Noop` |
//! | Dragged id no longer on the board | state unchanged, `Noop` |
//! | Center falls in a gap | offset updated, `Moved` with a hold reason |

use kanban_core::event::DragInput;
use kanban_core::geometry::Point;
use kanban_core::model::{Board, CardId, ColumnId};
use kanban_layout::{
    determine_drop_index_in_column, find_card_at, find_column_at, is_header_pressed, move_item,
    should_swap_cards, should_swap_columns,
};
use serde::{Deserialize, Serialize};

/// The active drag, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Column {
        column_id: ColumnId,
        /// Index in the board's column list as of the last step.
        index: usize,
        offset: Point,
    },
    Card {
        card_id: CardId,
        /// Index in the owning column's card list as of the last step.
        index: usize,
        /// Column currently holding the card (changes on transfer).
        column_id: ColumnId,
        column_index: usize,
        offset: Point,
    },
}

impl DragState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Live offset of the floating copy.
    #[must_use]
    pub const fn offset(&self) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::Column { offset, .. } | Self::Card { offset, .. } => Some(*offset),
        }
    }

    /// What is being dragged.
    #[must_use]
    pub const fn item(&self) -> Option<DragItem> {
        match self {
            Self::Idle => None,
            Self::Column { column_id, .. } => Some(DragItem::Column(*column_id)),
            Self::Card { card_id, .. } => Some(DragItem::Card(*card_id)),
        }
    }
}

/// Identity of the dragged element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragItem {
    Column(ColumnId),
    Card(CardId),
}

/// Why an input was ignored entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    /// Move/end/cancel without an active drag.
    Idle,
    /// Start while a drag is already in progress.
    AlreadyDragging,
    /// Start where no mounted column is under the pointer.
    NoColumnAtPointer,
    /// Start on a column but neither its header nor a card.
    NothingPressed,
    /// The dragged column/card is no longer on the board.
    DraggedItemMissing,
    /// No board is loaded.
    BoardMissing,
}

/// Why a move updated the offset without reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldReason {
    /// The dragged center is over no mounted column/card.
    NoTargetAtCenter,
    /// The dragged center is over the item's own slot.
    SameSlot,
    /// Over another item, but its center has not been crossed yet.
    BelowHysteresis,
}

/// Outcome of one drag step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    ColumnPicked {
        column_id: ColumnId,
        index: usize,
        offset: Point,
    },
    CardPicked {
        card_id: CardId,
        column_id: ColumnId,
        index: usize,
        offset: Point,
    },
    Moved {
        offset: Point,
        hold: HoldReason,
    },
    ColumnSwapped {
        column_id: ColumnId,
        from: usize,
        to: usize,
    },
    CardSwapped {
        card_id: CardId,
        column_id: ColumnId,
        from: usize,
        to: usize,
    },
    CardTransferred {
        card_id: CardId,
        from_column: ColumnId,
        to_column: ColumnId,
        from_index: usize,
        to_index: usize,
    },
    Dropped {
        item: DragItem,
    },
    Canceled {
        item: DragItem,
    },
    Noop {
        reason: DragNoopReason,
    },
}

impl DragEffect {
    /// Whether this step changed column or card order.
    #[must_use]
    pub const fn is_reorder(&self) -> bool {
        matches!(
            self,
            Self::ColumnSwapped { .. } | Self::CardSwapped { .. } | Self::CardTransferred { .. }
        )
    }

    /// Whether this step ended a drag session.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self, Self::Dropped { .. } | Self::Canceled { .. })
    }

    const fn noop(reason: DragNoopReason) -> Self {
        Self::Noop { reason }
    }
}

/// Result of applying one input.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStep {
    pub board: Board,
    pub drag: DragState,
    pub effect: DragEffect,
}

impl DragStep {
    fn new(board: Board, drag: DragState, effect: DragEffect) -> Self {
        Self {
            board,
            drag,
            effect,
        }
    }
}

/// Apply one pointer input.
#[must_use]
pub fn apply(board: Board, drag: DragState, input: DragInput) -> DragStep {
    match input {
        DragInput::Start(pointer) => {
            let (drag, effect) = on_drag_start(&board, drag, pointer);
            DragStep::new(board, drag, effect)
        }
        DragInput::Move(delta) => on_drag(board, drag, delta),
        DragInput::End => {
            let (drag, effect) = on_drag_end(drag);
            DragStep::new(board, drag, effect)
        }
        DragInput::Cancel => {
            let (drag, effect) = on_drag_cancel(drag);
            DragStep::new(board, drag, effect)
        }
    }
}

/// Classify a press and, if it lands on a header or card, begin a drag.
#[must_use]
pub fn on_drag_start(board: &Board, drag: DragState, pointer: Point) -> (DragState, DragEffect) {
    if drag.is_active() {
        return (drag, DragEffect::noop(DragNoopReason::AlreadyDragging));
    }
    let Some(hit) = find_column_at(pointer.x, &board.columns, &board.viewport) else {
        return (drag, DragEffect::noop(DragNoopReason::NoColumnAtPointer));
    };
    let column = hit.item;

    if is_header_pressed(column, pointer.y) {
        let anchor = Point::new(
            column.coordinates.width / 2.0,
            column.header_coordinates.height / 2.0,
        );
        let offset = pointer - anchor;
        let next = DragState::Column {
            column_id: column.id,
            index: hit.index,
            offset,
        };
        return (
            next,
            DragEffect::ColumnPicked {
                column_id: column.id,
                index: hit.index,
                offset,
            },
        );
    }

    let Some(card) = find_card_at(column, pointer.y) else {
        return (drag, DragEffect::noop(DragNoopReason::NothingPressed));
    };
    let offset = pointer - card.item.coordinates.half_extent();
    let next = DragState::Card {
        card_id: card.item.id,
        index: card.index,
        column_id: column.id,
        column_index: hit.index,
        offset,
    };
    (
        next,
        DragEffect::CardPicked {
            card_id: card.item.id,
            column_id: column.id,
            index: card.index,
            offset,
        },
    )
}

/// Advance the floating copy by `delta` (or re-run placement with the last
/// offset when `None`) and commit at most one reorder.
#[must_use]
pub fn on_drag(board: Board, drag: DragState, delta: Option<Point>) -> DragStep {
    let delta = delta.unwrap_or(Point::ZERO);
    match drag {
        DragState::Idle => DragStep::new(board, drag, DragEffect::noop(DragNoopReason::Idle)),
        DragState::Column {
            column_id, offset, ..
        } => drag_column(board, drag, column_id, offset + delta),
        DragState::Card {
            card_id, offset, ..
        } => drag_card(board, drag, card_id, offset + delta),
    }
}

/// Release: end the session, keeping the order committed so far.
#[must_use]
pub fn on_drag_end(drag: DragState) -> (DragState, DragEffect) {
    match drag.item() {
        Some(item) => (DragState::Idle, DragEffect::Dropped { item }),
        None => (drag, DragEffect::noop(DragNoopReason::Idle)),
    }
}

/// Abort: end the session, keeping the order committed so far.
#[must_use]
pub fn on_drag_cancel(drag: DragState) -> (DragState, DragEffect) {
    match drag.item() {
        Some(item) => (DragState::Idle, DragEffect::Canceled { item }),
        None => (drag, DragEffect::noop(DragNoopReason::Idle)),
    }
}

fn drag_column(mut board: Board, drag: DragState, column_id: ColumnId, offset: Point) -> DragStep {
    let Some(current) = board.column_index(column_id) else {
        return DragStep::new(board, drag, DragEffect::noop(DragNoopReason::DraggedItemMissing));
    };
    let center_x = offset.x + board.columns[current].coordinates.width / 2.0;

    let target = find_column_at(center_x, &board.columns, &board.viewport)
        .map(|hit| (hit.index, hit.item.coordinates.center_x()));

    let (index, effect) = match target {
        None => (current, hold(offset, HoldReason::NoTargetAtCenter)),
        Some((target_index, _)) if target_index == current => {
            (current, hold(offset, HoldReason::SameSlot))
        }
        Some((target_index, target_center_x)) => {
            if should_swap_columns(center_x, target_center_x, current, target_index)
                && move_item(&mut board.columns, current, target_index)
            {
                tracing::debug!(
                    target: "kanban.drag",
                    column = %column_id,
                    from = current,
                    to = target_index,
                    "column reordered"
                );
                (
                    target_index,
                    DragEffect::ColumnSwapped {
                        column_id,
                        from: current,
                        to: target_index,
                    },
                )
            } else {
                (current, hold(offset, HoldReason::BelowHysteresis))
            }
        }
    };

    let next = DragState::Column {
        column_id,
        index,
        offset,
    };
    DragStep::new(board, next, effect)
}

fn drag_card(mut board: Board, drag: DragState, card_id: CardId, offset: Point) -> DragStep {
    let Some((col_idx, card_idx)) = board.locate_card(card_id) else {
        return DragStep::new(board, drag, DragEffect::noop(DragNoopReason::DraggedItemMissing));
    };
    let center = offset + board.columns[col_idx].cards[card_idx].coordinates.half_extent();
    let source_id = board.columns[col_idx].id;

    let target = find_column_at(center.x, &board.columns, &board.viewport).map(|hit| {
        let drop_index = determine_drop_index_in_column(center.y, hit.item);
        (hit.index, hit.item.id, drop_index)
    });

    let Some((target_col, target_id, drop_index)) = target else {
        let next = card_state(card_id, card_idx, source_id, col_idx, offset);
        return DragStep::new(board, next, hold(offset, HoldReason::NoTargetAtCenter));
    };

    if target_col != col_idx {
        let card = board.columns[col_idx].cards.remove(card_idx);
        let cards = &mut board.columns[target_col].cards;
        let to_index = drop_index.min(cards.len());
        cards.insert(to_index, card);

        tracing::debug!(
            target: "kanban.drag",
            card = %card_id,
            from_column = %source_id,
            to_column = %target_id,
            to_index,
            "card transferred"
        );
        let next = card_state(card_id, to_index, target_id, target_col, offset);
        let effect = DragEffect::CardTransferred {
            card_id,
            from_column: source_id,
            to_column: target_id,
            from_index: card_idx,
            to_index,
        };
        return DragStep::new(board, next, effect);
    }

    let hit = find_card_at(&board.columns[col_idx], center.y)
        .map(|hit| (hit.index, hit.item.coordinates.center_y()));

    let (index, effect) = match hit {
        None => (card_idx, hold(offset, HoldReason::NoTargetAtCenter)),
        Some((target_index, _)) if target_index == card_idx => {
            (card_idx, hold(offset, HoldReason::SameSlot))
        }
        Some((target_index, target_center_y)) => {
            if should_swap_cards(center.y, target_center_y, card_idx, target_index)
                && move_item(&mut board.columns[col_idx].cards, card_idx, target_index)
            {
                tracing::debug!(
                    target: "kanban.drag",
                    card = %card_id,
                    column = %source_id,
                    from = card_idx,
                    to = target_index,
                    "card reordered"
                );
                (
                    target_index,
                    DragEffect::CardSwapped {
                        card_id,
                        column_id: source_id,
                        from: card_idx,
                        to: target_index,
                    },
                )
            } else {
                (card_idx, hold(offset, HoldReason::BelowHysteresis))
            }
        }
    };

    let next = card_state(card_id, index, source_id, col_idx, offset);
    DragStep::new(board, next, effect)
}

const fn card_state(
    card_id: CardId,
    index: usize,
    column_id: ColumnId,
    column_index: usize,
    offset: Point,
) -> DragState {
    DragState::Card {
        card_id,
        index,
        column_id,
        column_index,
        offset,
    }
}

const fn hold(offset: Point, reason: HoldReason) -> DragEffect {
    DragEffect::Moved {
        offset,
        hold: reason,
    }
}
