#![forbid(unsafe_code)]

//! Geometry queries and placement decisions for the kanban drag engine.
//!
//! - [`registry`]: apply coalesced layout batches to a board.
//! - [`hit_test`]: map a pointer coordinate to the mounted column/card under it.
//! - [`reorder`]: directional hysteresis for swaps, and drop-index selection
//!   for cross-column transfers.
//!
//! Everything here is a pure function over `kanban-core` values; state and
//! sequencing live in `kanban-runtime`.

pub mod hit_test;
pub mod registry;
pub mod reorder;

pub use hit_test::{find_card_at, find_column_at, is_header_pressed};
pub use registry::CoordinateBatch;
pub use reorder::{
    determine_drop_index_in_column, move_item, should_swap, should_swap_cards,
    should_swap_columns,
};
