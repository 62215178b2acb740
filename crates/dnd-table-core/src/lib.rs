//! Core types for drag-and-drop reorderable tables.
//!
//! This crate contains the data structures shared by the engine and the UI:
//! - Row geometry snapshots and move results
//! - Table records, row keys, and expansion state
//! - Zebra striping
//! - Configuration types
//! - Error types

mod config;
mod error;
mod geometry;
mod stripe;
mod table;

pub use config::{
    config_dir, config_path, AppearanceConfig, GridTrack, KeyBindingsConfig, TableConfig,
    ThemeMode,
};
pub use error::{ConfigError, DataError};
pub use geometry::{
    ContainerGeometry, Edge, MoveResult, Placement, RowBounds, ScrollDirection,
    PROXIMITY_THRESHOLD, SCROLL_STEP, SHADOW_OFFSET,
};
pub use stripe::{zebra_stripes, RowStripes, Stripe};
pub use table::{move_element, ExpandedRows, RowKey, TableData, TableRow};
