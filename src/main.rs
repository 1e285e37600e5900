use anyhow::Context;
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod ids;
mod models;
mod storage;
mod store;
mod ui;

use config::{load_settings, Cli};
use storage::FileStore;
use store::ListStore;
use ui::app::{GymListApp, APP_TITLE};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let storage = FileStore::open(&settings.data_dir)
        .with_context(|| format!("cannot use data directory {}", settings.data_dir.display()))?;
    info!("saving to {}", storage.dir().display());

    let store = ListStore::load(storage, settings.id_strategy);
    info!("loaded {} items", store.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size(settings.window_size),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(GymListApp::new(cc, store)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))
}
