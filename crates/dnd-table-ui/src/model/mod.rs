//! State model for the table UI.
//!
//! All types here are GPUI-independent for testability.

mod layout;
mod surface;
mod table;

pub use layout::{ShadowRow, TableLayout};
pub use surface::{SurfaceLayout, SurfaceModel, SurfaceVisuals};
pub use table::{OrderUpdate, SurfaceId, TableModel};
