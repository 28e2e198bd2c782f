//! Command orchestration from UI actions to the loader worker queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::LoaderCommand;

pub fn dispatch_loader_command(
    cmd_tx: &Sender<LoaderCommand>,
    cmd: LoaderCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->loader command");
            *status = "Loading simulation...".to_string();
        }
        Err(TrySendError::Full(_)) => {
            *status = "Loader queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "loader worker is gone");
            *status = "Loader worker disconnected (possible startup failure); restart the viewer"
                .to_string();
        }
    }
}
