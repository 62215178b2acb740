//! GPUI keybinding registration.
//!
//! `apply_keybindings()` registers the configured table bindings with GPUI
//! at startup. All bindings are scoped to the `DndTable` key context.

use std::rc::Rc;

#[cfg(test)]
use gpui::Keystroke;
use gpui::{App, DummyKeyboardMapper, KeyBinding, KeyBindingContextPredicate};

use dnd_table_core::KeyBindingsConfig;

use crate::actions::action_from_name;

/// Key context the table view sets on its root element.
pub const KEY_CONTEXT: &str = "DndTable";

// =============================================================================
// Keystroke Parsing
// =============================================================================

/// Convert user-friendly keystroke to GPUI format.
///
/// Users write: "ctrl+e" or "ctrl+shift+e"
/// GPUI expects: "ctrl-e" or "ctrl-shift-e"
fn normalize_keystroke(s: &str) -> String {
    s.replace('+', "-")
}

/// Parse keystroke string to GPUI Keystroke.
#[cfg(test)]
fn parse_keystroke(s: &str) -> Result<Keystroke, String> {
    let normalized = normalize_keystroke(s);
    Keystroke::parse(&normalized).map_err(|e| format!("Invalid keystroke '{}': {:?}", s, e))
}

fn context_predicate() -> Option<Rc<KeyBindingContextPredicate>> {
    KeyBindingContextPredicate::parse(KEY_CONTEXT)
        .ok()
        .map(Rc::new)
}

// =============================================================================
// Apply Keybindings
// =============================================================================

/// Register every configured binding with GPUI.
///
/// A binding that fails to load is logged and skipped; the rest still apply.
pub fn apply_keybindings(keys: &KeyBindingsConfig, cx: &mut App) {
    let mut registered = 0;
    for (name, key) in keys.bindings() {
        if apply_binding(name, key, cx) {
            registered += 1;
        }
    }
    tracing::debug!("Registered {} table key bindings", registered);
}

fn apply_binding(name: &str, key: &str, cx: &mut App) -> bool {
    let Some(action) = action_from_name(name) else {
        tracing::warn!("Unknown action: {}", name);
        return false;
    };

    let keystroke = normalize_keystroke(key);
    match KeyBinding::load(
        &keystroke,
        action,
        context_predicate(),
        false, // use_key_equivalents
        None,  // action_input
        &DummyKeyboardMapper,
    ) {
        Ok(binding) => {
            cx.bind_keys([binding]);
            tracing::debug!("Registered action binding: {} -> {}", key, name);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to create binding for '{}': {:?}", key, e);
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
