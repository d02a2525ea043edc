//! FILENAME: table-engine/src/lib.rs
//! Grouping/sorting/expansion table engine.
//!
//! Given an arbitrary sequence of records and a column configuration,
//! this crate computes sort order, partitions rows into nested groups,
//! tracks per-group expansion, and emits renderable row descriptors for
//! a presentation layer to draw. It is a pure, synchronous data-shaping
//! library: no I/O, no background work, full recomputation per refresh.
//!
//! Layers:
//! - `definition`: Declarative configuration (what the table IS)
//! - `sort` / `group` / `classify`: Calculation stages (HOW we compute)
//! - `expansion`: Per-group expand/collapse state
//! - `view`: Renderable output for the presentation layer (WHAT we display)
//! - `engine`: Pipeline composition and the table controller

pub mod aggregate;
pub mod classify;
pub mod definition;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod group;
pub mod sort;
pub mod view;

pub use classify::classify;
pub use definition::{
    Column, ColumnKey, ColumnSet, GroupSpec, SortDirection, SortKey, SortSpec, TableState,
};
pub use engine::{compute_view, TableController};
pub use error::ConfigError;
pub use expansion::{ExpansionState, NodePath};
pub use group::{group_rows, GroupNode, NodeChildren};
pub use sort::{sort_order, sorted};
pub use view::{
    CellDescriptor, CellKind, HeaderDescriptor, RowDescriptor, RowKind, TableView,
};

// Re-export the shared value types so callers need only one import.
pub use table_model::{OrderedFloat, RowValue};
