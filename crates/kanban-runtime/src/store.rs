#![forbid(unsafe_code)]

//! Shared board store.
//!
//! Readers (the renderer, hit-test queries on the UI thread) take wait-free
//! snapshots with [`BoardStore::load`]. Writers go through
//! [`BoardStore::dispatch`], which serializes reductions behind a mutex and
//! publishes each new [`BoardState`] with an atomic pointer swap.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `load` | wait-free `Arc` clone |
//! | `dispatch` | one reduction under the writer lock, one swap |
//!
//! # Failure Modes
//!
//! - A panic while holding the writer lock poisons it; later writers recover
//!   the guard and continue from the last published snapshot.
//! - A failing [`PositionSink`] is logged at `warn` and otherwise ignored.
//!   The in-memory order stays authoritative.
//! - The sink runs outside the writer lock, so concurrent drops may arrive
//!   out of order. Snapshots carry the state `version` for the sink to
//!   order by.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use kanban_core::event::DragInput;
use kanban_core::geometry::Point;
use kanban_core::model::Board;

use crate::persistence::{NullSink, PositionSink};
use crate::session::DragEffect;
use crate::state::{BoardAction, BoardState};

pub struct BoardStore {
    snapshot: ArcSwap<BoardState>,
    writer: Mutex<()>,
    sink: Arc<dyn PositionSink>,
}

impl fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.snapshot.load();
        f.debug_struct("BoardStore")
            .field("version", &state.version)
            .field("has_board", &state.board.is_some())
            .field("drag", &state.drag)
            .finish_non_exhaustive()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(Arc::new(NullSink))
    }
}

impl BoardStore {
    /// Empty store; drag inputs are ignored until a board is loaded.
    #[must_use]
    pub fn new(sink: Arc<dyn PositionSink>) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(BoardState::default()),
            writer: Mutex::new(()),
            sink,
        }
    }

    #[must_use]
    pub fn with_board(board: Board, sink: Arc<dyn PositionSink>) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(BoardState::new(board)),
            writer: Mutex::new(()),
            sink,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<BoardState> {
        self.snapshot.load_full()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.snapshot.load().version
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.snapshot.load().drag.is_active()
    }

    /// Reduce `action` against the latest state and publish the result.
    ///
    /// Returns the drag effect for [`BoardAction::Drag`], `None` otherwise.
    pub fn dispatch(&self, action: BoardAction) -> Option<DragEffect> {
        let transition = {
            let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            let current = self.snapshot.load();
            let transition = current.reduce(action);
            if let Some(next) = &transition.next {
                self.snapshot.store(Arc::new(next.clone()));
            }
            transition
        };

        if let Some(effect) = &transition.effect {
            tracing::trace!(
                target: "kanban.store",
                effect = ?effect,
                version = ?transition.next.as_ref().map(|s| s.version),
                "drag input reduced"
            );
        }
        if let Some(snapshot) = &transition.persist {
            match self.sink.persist(snapshot) {
                Ok(()) => tracing::debug!(
                    target: "kanban.store",
                    board_id = %snapshot.board_id,
                    version = snapshot.version,
                    columns = snapshot.columns.len(),
                    "positions persisted"
                ),
                Err(err) => tracing::warn!(
                    target: "kanban.store",
                    board_id = %snapshot.board_id,
                    error = %err,
                    "position persistence failed"
                ),
            }
        }
        transition.effect
    }

    pub fn load_board(&self, board: Board) {
        self.dispatch(BoardAction::LoadBoard(board));
    }

    pub fn on_drag_start(&self, pointer: Point) -> Option<DragEffect> {
        self.dispatch(BoardAction::Drag(DragInput::Start(pointer)))
    }

    pub fn on_drag(&self, delta: Option<Point>) -> Option<DragEffect> {
        self.dispatch(BoardAction::Drag(DragInput::Move(delta)))
    }

    pub fn on_drag_end(&self) -> Option<DragEffect> {
        self.dispatch(BoardAction::Drag(DragInput::End))
    }

    pub fn on_drag_cancel(&self) -> Option<DragEffect> {
        self.dispatch(BoardAction::Drag(DragInput::Cancel))
    }
}
