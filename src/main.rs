//! Paper Explorer - CORD-19 Research Papers Explorer
//!
//! Loads paper metadata from CSV once, filters it by publication year and
//! shows publication trends, top journals, a title word cloud and a sample.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::{anyhow, Context};
use config::{AppConfig, CONFIG_FILE};
use eframe::egui;
use gui::ExplorerApp;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paper_explorer=info")),
        )
        .init();

    info!("starting paper explorer v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(Path::new(CONFIG_FILE))
        .with_context(|| format!("failed to read {CONFIG_FILE}"))?;

    // Missing or unreadable data is fatal; there is nothing to show without it.
    let base = data::load_papers_cached(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("CORD-19 Research Papers Explorer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CORD-19 Research Papers Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(cc, base, config)))),
    )
    .map_err(|e| anyhow!("failed to start the explorer window: {e}"))
}
