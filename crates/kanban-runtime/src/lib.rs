#![forbid(unsafe_code)]

//! Kanban drag engine runtime.
//!
//! # Key Components
//!
//! - [`session`]: drag state machine (start / move / end / cancel).
//! - [`BoardState`] / [`BoardAction`]: the reducer that applies layout
//!   batches and drag inputs to one versioned snapshot.
//! - [`BoardStore`]: single-writer store publishing snapshots to readers.
//! - [`LayoutPipeline`]: the [`LayoutObserver`] port, coalescing layout
//!   reports into batch actions.
//! - [`PositionSink`]: port receiving final positions when a drag ends.
//! - [`EngineConfig`]: coalescer timing as data.
//!
//! # How it fits in the system
//! The rendering layer owns an `Arc<BoardStore>` and an
//! `Arc<LayoutPipeline>`. It reports geometry to the pipeline, forwards
//! pointer events to the store, ticks the pipeline with `poll(now)`, and
//! renders whatever [`BoardStore::load`] returns.

pub mod config;
pub mod layout_pipeline;
#[cfg(feature = "logging")]
pub mod logging;
pub mod persistence;
pub mod session;
pub mod state;
pub mod store;

pub use config::{CoalescerPolicy, EngineConfig, EngineConfigError};
pub use layout_pipeline::{LayoutObserver, LayoutPipeline};
pub use persistence::{
    CardPosition, ColumnPosition, MemorySink, NullSink, PersistError, PositionSink,
    PositionSnapshot,
};
pub use session::{DragEffect, DragItem, DragNoopReason, DragState, DragStep, HoldReason};
pub use state::{BoardAction, BoardState, Transition};
pub use store::BoardStore;
