use shared::domain::TickIndex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown state '{state}'")]
    UnknownState { state: String },
    #[error("tick {tick} is outside the {len} available ticks")]
    TickOutOfRange { tick: TickIndex, len: usize },
    #[error("render failure: {0}")]
    Render(String),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("playback interval must be greater than zero")]
    InvalidInterval,
    #[error("view #{index} failed at {}: {source}", tick_label(.tick))]
    View {
        index: usize,
        tick: Option<TickIndex>,
        #[source]
        source: ViewError,
    },
    #[error("view #{index} is already borrowed")]
    ViewBusy { index: usize },
}

fn tick_label(tick: &Option<TickIndex>) -> String {
    match tick {
        Some(tick) => format!("tick {tick}"),
        None => "reset".to_string(),
    }
}
