#![forbid(unsafe_code)]

//! Position persistence port.
//!
//! The engine does not write storage. When a drag session ends, list order
//! is the single source of truth; [`normalize_positions`] rewrites the
//! denormalized `position` fields densely from it and produces a
//! [`PositionSnapshot`] that is handed to a [`PositionSink`].
//!
//! Sinks are called from the thread that dispatched the drop, after the new
//! board snapshot has been published and the store's writer lock released.
//! Implementations should hand the snapshot off (channel, job queue) rather
//! than block on I/O.
//!
//! # Ordering
//!
//! Drops dispatched from different threads can reach the sink in either
//! order. Every snapshot carries the `version` of the board state it was
//! taken from; a sink must not let an older version overwrite a newer one
//! (see [`PositionSnapshot::is_newer_than`]).

use std::fmt;
use std::sync::Mutex;

use kanban_core::model::{Board, BoardId, CardId, ColumnId};
use serde::{Deserialize, Serialize};

/// Dense zero-based position of one card within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPosition {
    pub card_id: CardId,
    pub position: u32,
}

/// Dense zero-based position of one column, with its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPosition {
    pub column_id: ColumnId,
    pub position: u32,
    pub cards: Vec<CardPosition>,
}

/// Final ordering of a board at the moment of drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub board_id: BoardId,
    /// Version of the published board state this ordering belongs to.
    pub version: u64,
    pub columns: Vec<ColumnPosition>,
}

impl PositionSnapshot {
    /// Whether `self` should replace `previous` in storage. Always `false`
    /// for snapshots of different boards.
    #[must_use]
    pub fn is_newer_than(&self, previous: &Self) -> bool {
        self.board_id == previous.board_id && self.version > previous.version
    }

    /// Column holding `card_id` and the card's position in it.
    #[must_use]
    pub fn card(&self, card_id: CardId) -> Option<(ColumnId, u32)> {
        self.columns.iter().find_map(|column| {
            column
                .cards
                .iter()
                .find(|card| card.card_id == card_id)
                .map(|card| (column.column_id, card.position))
        })
    }
}

/// Rewrite every `position` field from list order and describe the result
/// as of state `version`.
pub fn normalize_positions(board: &mut Board, version: u64) -> PositionSnapshot {
    let columns = board
        .columns
        .iter_mut()
        .zip(0u32..)
        .map(|(column, position)| {
            column.position = position;
            let cards = column
                .cards
                .iter_mut()
                .zip(0u32..)
                .map(|(card, position)| {
                    card.position = position;
                    CardPosition {
                        card_id: card.id,
                        position,
                    }
                })
                .collect();
            ColumnPosition {
                column_id: column.id,
                position,
                cards,
            }
        })
        .collect();
    PositionSnapshot {
        board_id: board.id,
        version,
        columns,
    }
}

/// Failure reported by a [`PositionSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The backing store rejected or failed the write.
    Storage(String),
    /// The sink is shut down and accepts no more work.
    Closed,
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(msg) => write!(f, "position write failed: {msg}"),
            Self::Closed => write!(f, "position sink is closed"),
        }
    }
}

impl std::error::Error for PersistError {}

/// External "persist positions" collaborator.
pub trait PositionSink: Send + Sync {
    fn persist(&self, snapshot: &PositionSnapshot) -> Result<(), PersistError>;
}

/// Sink that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PositionSink for NullSink {
    fn persist(&self, _snapshot: &PositionSnapshot) -> Result<(), PersistError> {
        Ok(())
    }
}

/// Sink that keeps every snapshot in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    snapshots: Mutex<Vec<PositionSnapshot>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots received so far, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<PositionSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<PositionSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl PositionSink for MemorySink {
    fn persist(&self, snapshot: &PositionSnapshot) -> Result<(), PersistError> {
        self.snapshots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(snapshot.clone());
        Ok(())
    }
}
