//! GPUI front-end for the drag-reorder table.
//!
//! This crate provides:
//! - `SimpleDndTable`, the table view with handles and expandable inner groups
//! - A GPUI-independent model of each drag surface
//! - Theme, actions, and configurable key bindings
//! - Window bootstrap for the `dnd-table` binary

pub mod actions;
pub mod keymap;
pub mod model;
pub mod theme;
pub mod views;
pub mod window;

pub use model::{
    OrderUpdate, ShadowRow, SurfaceId, SurfaceLayout, SurfaceModel, SurfaceVisuals, TableLayout,
    TableModel,
};
pub use theme::{Appearance, Theme, ThemeExt, ThemeSettings};
pub use views::{SimpleDndTable, SimpleDndTableEvent};
pub use window::run_table;
