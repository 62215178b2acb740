//! Window bootstrap for the table widget.

use gpui::{
    px, size, App, AppContext, Bounds, Pixels, TitlebarOptions, WindowAppearance, WindowBounds,
    WindowKind, WindowOptions,
};

use dnd_table_core::{TableConfig, TableData};

use crate::keymap::apply_keybindings;
use crate::theme::{Theme, ThemeSettings};
use crate::views::{SimpleDndTable, SimpleDndTableEvent};

// =============================================================================
// Window Configuration
// =============================================================================

pub const DEFAULT_WIDTH: f32 = 720.0;
pub const DEFAULT_HEIGHT: f32 = 480.0;

fn create_window_options(bounds: Bounds<Pixels>) -> WindowOptions {
    WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        titlebar: Some(TitlebarOptions {
            title: Some("dnd-table".into()),
            ..Default::default()
        }),
        focus: true,
        show: true,
        kind: WindowKind::Normal,
        ..Default::default()
    }
}

fn system_is_dark(cx: &App) -> bool {
    matches!(
        cx.window_appearance(),
        WindowAppearance::Dark | WindowAppearance::VibrantDark
    )
}

// =============================================================================
// App Entry Point
// =============================================================================

/// Run the table in its own window until the app quits.
///
/// Every order update is logged; the records themselves live in the view.
pub fn run_table(config: TableConfig, data: TableData) {
    gpui::Application::new().run(move |cx: &mut App| {
        let settings = ThemeSettings::from_config(&config.appearance);
        cx.set_global(Theme::from_settings(&settings, system_is_dark(cx)));
        cx.set_global(settings);

        apply_keybindings(&config.keys, cx);

        let bounds = Bounds::centered(None, size(px(DEFAULT_WIDTH), px(DEFAULT_HEIGHT)), cx);
        let opened = cx.open_window(create_window_options(bounds), |window, cx| {
            let table = cx.new(|cx| SimpleDndTable::new(data.clone(), &config, window, cx));

            cx.subscribe(&table, |_, event: &SimpleDndTableEvent, _cx| match event {
                SimpleDndTableEvent::OrderUpdated(data) => {
                    let json = serde_json::to_string(data).unwrap_or_default();
                    tracing::info!("Order updated: {}", json);
                }
            })
            .detach();

            table
        });

        if let Err(e) = opened {
            tracing::error!("Failed to open table window: {:?}", e);
            cx.quit();
            return;
        }

        cx.activate(true);
    });
}

// =============================================================================
// Tests
// =============================================================================
