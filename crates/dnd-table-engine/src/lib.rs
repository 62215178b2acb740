//! Drag-reorder engine for dnd-table.
//!
//! This crate turns pointer motion over an ordered list of rows into a single
//! `(from, to)` move:
//! - `ReorderEngine` - drag session state, hit-testing, move resolution
//! - `RowBoundsProvider` - read-only row geometry, real or synthetic
//! - `EventChannel` - listener registry for emitted moves
//! - `DragSurfaceController` - bridges pointer events to the engine and
//!   drives a `DragSurface`'s visuals
//!
//! Nothing here knows how rows are rendered.

pub mod bounds;
pub mod controller;
pub mod engine;
pub mod events;

pub use bounds::RowBoundsProvider;
pub use controller::{DragSurface, DragSurfaceController, PointerTarget};
pub use engine::{
    nearest_placement, DragPhase, DragSession, HighlightState, ReorderEngine, RowHighlight,
};
pub use events::{EventChannel, MoveEvents, Subscription};

// Re-export dnd_table_core types for convenience
pub use dnd_table_core::{ContainerGeometry, Edge, MoveResult, RowBounds, ScrollDirection};
