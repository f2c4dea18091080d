#![forbid(unsafe_code)]

//! Core: geometry, board model, layout events, and update coalescing.
//!
//! # Role in the drag engine
//! `kanban-core` is the leaf layer. It owns the value types every other
//! crate speaks in ([`geometry::Coordinates`], [`model::Board`],
//! [`event::LayoutEvent`]) and the [`update_coalescer`] that batches
//! high-frequency layout observations.
//!
//! # How it fits in the system
//! `kanban-layout` answers geometric questions over these types (hit tests,
//! swap decisions, registry updates). `kanban-runtime` drives the drag
//! session and publishes board snapshots back to the rendering layer.

pub mod event;
pub mod geometry;
pub mod model;
pub mod update_coalescer;

pub use event::{DragInput, ElementKind, LayoutElement, LayoutEvent};
pub use geometry::{Coordinates, Point};
pub use model::{
    Board, BoardId, Card, CardId, Column, ColumnId, ContainmentReport, IndexedItem, ViewportState,
};
pub use update_coalescer::{CoalescerConfig, ThrottledDebouncedProcessor};
