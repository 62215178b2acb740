//! dnd-table demo - main entry point.
//!
//! Loads configuration and table records, then opens the table window.
//!
//! Usage: `dnd-table [DATA.json]`

use std::path::Path;

use dnd_table_core::{config_path, TableConfig, TableData, TableRow};
use dnd_table_ui::window::run_table;

// =============================================================================
// Configuration
// =============================================================================

/// Load `config.toml`, falling back to defaults on any error.
fn load_config() -> TableConfig {
    match TableConfig::load_default() {
        Ok(config) => {
            if let Some(path) = config_path().filter(|p| p.exists()) {
                tracing::info!("Loaded config from: {}", path.display());
            } else {
                tracing::info!("No config.toml found - using defaults");
            }
            config
        }
        Err(e) => {
            tracing::error!("Config error: {} - continuing with defaults", e);
            TableConfig::default()
        }
    }
}

/// Name columns "Column 1".."Column n" when the config gives no headers.
fn fill_headers(config: &mut TableConfig, data: &TableData) {
    if config.headers.is_empty() {
        config.headers = (1..=data.column_count())
            .map(|i| format!("Column {}", i))
            .collect();
    }
}

// =============================================================================
// Sample Data
// =============================================================================

fn sample_data() -> TableData {
    TableData::new(vec![
        TableRow::new("1", ["1", "2", "3"]),
        TableRow::new("2", ["4", "5", "6"]).with_inner(vec![
            TableRow::new("4", ["10", "11", "12"]),
            TableRow::new("5", ["13", "14", "15"]),
        ]),
        TableRow::new("3", ["7", "8", "9"]),
    ])
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("dnd-table starting...");

    let mut config = load_config();

    let data = match std::env::args().nth(1) {
        Some(path) => match TableData::load(Path::new(&path)) {
            Ok(data) => {
                tracing::info!("Loaded {} rows from {}", data.len(), path);
                data
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", path, e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => sample_data(),
    };

    fill_headers(&mut config, &data);

    tracing::info!("Starting GPUI application...");
    run_table(config, data);
}
