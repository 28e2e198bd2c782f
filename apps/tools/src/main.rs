use std::{
    io::{self, Write},
    path::PathBuf,
    rc::Rc,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use playback::{
    share, ManualClock, PlaybackConfig, PlaybackController, PlaybackState, PlayerView,
    SharedView, View, ViewError,
};
use shared::{
    domain::{SimulationData, TickIndex},
    settings::ViewerSettings,
};
use tracing_subscriber::EnvFilter;
use views::ViewSet;

#[derive(Parser, Debug)]
struct Cli {
    /// Viewer settings file; defaults to ./viewer.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a simulation: ticks, columns, transition totals.
    Inspect {
        #[arg(short = 'a', long)]
        abundance: PathBuf,
        #[arg(short = 't', long)]
        translog: Option<PathBuf>,
    },
    /// Print selected abundance columns as tab-separated values.
    Series {
        #[arg(short = 'a', long)]
        abundance: PathBuf,
        /// Columns to print; all of them when omitted.
        columns: Vec<String>,
    },
    /// Drive the playback controller headlessly, logging every tick.
    Replay {
        #[arg(short = 'a', long)]
        abundance: PathBuf,
        #[arg(short = 't', long)]
        translog: Option<PathBuf>,
        /// Skip the wall-clock interval between ticks.
        #[arg(long)]
        fast: bool,
    },
}

/// Logs every tick it is handed.
struct LogView;

impl View for LogView {
    fn tick(&mut self, tick: TickIndex) -> Result<(), ViewError> {
        tracing::info!(tick, "tick");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ViewError> {
        tracing::info!("reset");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect {
            abundance,
            translog,
        } => {
            let data = loader::load_simulation(&abundance, translog.as_deref())
                .await
                .with_context(|| format!("failed to load {}", abundance.display()))?;
            println!("ticks\t{}", data.max_ticks());
            println!("columns\t{}", data.abundance.columns().join(","));
            match &data.transitions {
                Some(log) => {
                    println!("transitions\t{}", log.total_events());
                    let busiest = (0..log.len())
                        .filter_map(|tick| log.slot(tick).map(|events| (tick, events.len())))
                        .max_by_key(|&(_, count)| count);
                    if let Some((tick, count)) = busiest {
                        println!("busiest_tick\t{tick}\t{count}");
                    }
                }
                None => println!("transitions\tnone"),
            }
        }
        Command::Series { abundance, columns } => {
            let table = loader::load_abundance(&abundance)
                .await
                .with_context(|| format!("failed to load {}", abundance.display()))?;
            let series = if columns.is_empty() {
                table.all_series()
            } else {
                table.series(&columns)?
            };

            let mut out = io::stdout().lock();
            let header: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
            writeln!(out, "tick\t{}", header.join("\t"))?;
            for tick in 0..table.len() {
                let row: Vec<String> = series.iter().map(|s| s.data[tick].to_string()).collect();
                writeln!(out, "{tick}\t{}", row.join("\t"))?;
            }
        }
        Command::Replay {
            abundance,
            translog,
            fast,
        } => {
            let settings = shared::settings::load_settings(cli.config.as_deref())?;
            let data = loader::load_simulation(&abundance, translog.as_deref())
                .await
                .with_context(|| format!("failed to load {}", abundance.display()))?;
            // Fast replays time agent flights on the same manual clock as the ticks.
            let clock = ManualClock::new();
            let views = if fast {
                ViewSet::assemble_with_clock(&data, &settings, Rc::new(clock.clone()))
            } else {
                ViewSet::assemble(&data, &settings)
            };
            let config = replay_config(&views, &data, &settings);
            let surface = PlayerView::new(data.max_ticks());

            let started = Instant::now();
            let readout = if fast {
                let mut controller =
                    PlaybackController::with_clock(config, surface, clock.clone())?;
                run_fast(&mut controller, &clock)?;
                controller.surface().ticks_text()
            } else {
                let mut controller = PlaybackController::new(config, surface)?;
                run_realtime(&mut controller).await?;
                controller.surface().ticks_text()
            };
            tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "replay finished");

            println!("{readout}");
            if let (Some(catalogue), Some(diagram)) = (&views.catalogue, &views.diagram) {
                let diagram = diagram.borrow();
                for (node, count) in catalogue.nodes().iter().zip(diagram.counts()) {
                    println!("{}\t{count}", node.name);
                }
            }
        }
    }

    Ok(())
}

fn replay_config(
    views: &ViewSet,
    data: &SimulationData,
    settings: &ViewerSettings,
) -> PlaybackConfig {
    let mut config = views.playback_config(data, settings);
    let log: SharedView = share(LogView);
    config.views.push(log);
    config
}

fn run_fast(
    controller: &mut PlaybackController<PlayerView, ManualClock>,
    clock: &ManualClock,
) -> Result<()> {
    controller.play();
    while controller.state() == PlaybackState::Playing {
        clock.advance(controller.interval());
        controller.update()?;
    }
    Ok(())
}

async fn run_realtime(controller: &mut PlaybackController<PlayerView>) -> Result<()> {
    controller.play();
    while let Some(deadline) = controller.next_deadline() {
        tokio::time::sleep_until(deadline.into()).await;
        controller.update()?;
    }
    Ok(())
}
