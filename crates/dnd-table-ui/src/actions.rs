//! Actions for the drag-reorder table.
//!
//! Dispatched by GPUI's key binding system within the `DndTable` context.

use gpui::actions;

actions!(dnd_table, [CancelDrag, ExpandAll, CollapseAll]);

/// Look up an action by name for GPUI registration.
///
/// Names match the fields of `KeyBindingsConfig`.
pub fn action_from_name(name: &str) -> Option<Box<dyn gpui::Action>> {
    match name {
        "cancel_drag" => Some(Box::new(CancelDrag)),
        "expand_all" => Some(Box::new(ExpandAll)),
        "collapse_all" => Some(Box::new(CollapseAll)),
        _ => None,
    }
}

/// Get all available action names.
pub fn available_actions() -> &'static [&'static str] {
    &["cancel_drag", "expand_all", "collapse_all"]
}
