use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::{LoaderCommand, SimulationFiles};
use ui::{PersistedViewerState, ViewerApp, PERSISTED_STATE_KEY};

#[derive(Parser, Debug)]
#[command(about = "Replays VERA simulation output as synchronized animated views")]
struct Args {
    /// Abundance table (tab-separated, one row per tick).
    #[arg(short = 'a', long = "abundance")]
    abundance: Option<PathBuf>,
    /// Transition log (tab-separated events).
    #[arg(short = 't', long = "translog")]
    translog: Option<PathBuf>,
    /// Viewer settings file; defaults to ./viewer.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let settings = shared::settings::load_settings(args.config.as_deref())
        .context("failed to load viewer settings")?;
    let startup = args.abundance.map(|abundance| SimulationFiles {
        abundance,
        transitions: args.translog,
    });

    let (cmd_tx, cmd_rx) = bounded::<LoaderCommand>(16);
    let (ui_tx, ui_rx) = bounded(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("VERA viewer")
            .with_inner_size([1200.0, 720.0])
            .with_min_inner_size([800.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "VERA viewer",
        options,
        Box::new(move |cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(PERSISTED_STATE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedViewerState>(&text).ok())
            });
            Ok(Box::new(ViewerApp::new(
                cmd_tx, ui_rx, settings, startup, persisted,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("viewer window failed: {err}"))
}
