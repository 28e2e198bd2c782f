//! Player control surface: publishes play/pause/reset/step intents and shows
//! the tick readout and play/pause affordance reported by the controller.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use shared::domain::TickIndex;

const INTENT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerIntent {
    Play,
    Pause,
    Reset,
    Step,
}

impl PlayerIntent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Reset => "reset",
            Self::Step => "step",
        }
    }
}

/// Inbound side used by the controller. `subscribe` is called once, when the
/// controller is built; everything after goes through the setters.
pub trait PlayerSurface {
    fn subscribe(&mut self) -> Receiver<PlayerIntent>;
    fn set_ticks(&mut self, tick: TickIndex);
    fn set_state_playing(&mut self);
    fn set_state_stopped(&mut self);
}

/// Cloneable handle for whatever raises intents (buttons, keyboard, CLI).
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: Sender<PlayerIntent>,
}

impl IntentSender {
    /// Queues `intent`; returns false when it could not be delivered.
    pub fn send(&self, intent: PlayerIntent) -> bool {
        match self.tx.try_send(intent) {
            Ok(()) => {
                tracing::debug!(intent = intent.name(), "queued player intent");
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(intent = intent.name(), "player intent queue is full");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!(intent = intent.name(), "player intent queue disconnected");
                false
            }
        }
    }
}

#[derive(Debug)]
pub struct PlayerView {
    max_ticks: usize,
    tick: TickIndex,
    playing: bool,
    tx: Sender<PlayerIntent>,
    rx: Receiver<PlayerIntent>,
}

impl PlayerView {
    pub fn new(max_ticks: usize) -> Self {
        let (tx, rx) = bounded(INTENT_QUEUE_CAPACITY);
        Self {
            max_ticks,
            tick: 0,
            playing: false,
            tx,
            rx,
        }
    }

    pub fn intents(&self) -> IntentSender {
        IntentSender {
            tx: self.tx.clone(),
        }
    }

    pub fn request(&self, intent: PlayerIntent) -> bool {
        self.intents().send(intent)
    }

    pub fn ticks_text(&self) -> String {
        format!("{} of {}", self.tick, self.max_ticks)
    }

    pub fn tick(&self) -> TickIndex {
        self.tick
    }

    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play_visible(&self) -> bool {
        !self.playing
    }

    pub fn pause_visible(&self) -> bool {
        self.playing
    }
}

impl PlayerSurface for PlayerView {
    fn subscribe(&mut self) -> Receiver<PlayerIntent> {
        self.rx.clone()
    }

    fn set_ticks(&mut self, tick: TickIndex) {
        self.tick = tick;
    }

    fn set_state_playing(&mut self) {
        self.playing = true;
    }

    fn set_state_stopped(&mut self) {
        self.playing = false;
    }
}
