mod app;
mod cli;
mod color;
mod config;
mod data;
mod reactive;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use eframe::egui;

use app::PenguinDashApp;
use cli::Cli;
use clap::Parser;
use config::{DEFAULT_DATA_FILE, DashboardConfig};
use data::density::PlotTheme;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DashboardConfig::resolve(&cli).context("loading configuration")?;
    log::info!(
        "starting {:?} dashboard, threshold range [{}, {}] default {}",
        config.variant,
        config.slider.min,
        config.slider.max,
        config.slider.default
    );

    let theme = config.theme;
    let mut state = AppState::new(config);
    // A bad startup path is reported in the UI rather than aborting.
    let startup = state.config.data_path.clone().or_else(|| {
        let fallback = Path::new(DEFAULT_DATA_FILE);
        fallback.exists().then(|| fallback.to_path_buf())
    });
    if let Some(path) = startup {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Palmer Penguins",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(match theme {
                PlotTheme::Light => egui::Visuals::light(),
                PlotTheme::Dark => egui::Visuals::dark(),
            });
            Ok(Box::new(PenguinDashApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
