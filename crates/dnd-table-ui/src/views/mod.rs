//! UI views for the table widget.
//!
//! Views are stateful GPUI components that manage focus and emit events.

mod simple_dnd_table;

pub use simple_dnd_table::{SimpleDndTable, SimpleDndTableEvent};
