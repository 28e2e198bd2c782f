//! Worker thread bridging the loader command queue to UI event intake.

use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::{LoaderCommand, SimulationFiles};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<LoaderCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("loader worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build loader runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Loader ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    LoaderCommand::Load(files) => {
                        let event = load(files).await;
                        if ui_tx.send(event).is_err() {
                            tracing::debug!("ui went away; stopping loader worker");
                            break;
                        }
                    }
                }
            }
        });
    });
}

async fn load(files: SimulationFiles) -> UiEvent {
    match loader::load_simulation(&files.abundance, files.transitions.as_deref()).await {
        Ok(data) => UiEvent::SimulationLoaded { files, data },
        Err(err) => {
            tracing::warn!(abundance = %files.abundance.display(), "load failed: {err}");
            UiEvent::Error(UiError::from(&err))
        }
    }
}
