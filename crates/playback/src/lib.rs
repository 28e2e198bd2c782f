//! Playback synchronization core: one tick clock driving any number of views
//! in lockstep, controlled through a player surface.

pub mod controller;
pub mod error;
pub mod surface;
pub mod timer;
pub mod view;

pub use controller::{PlaybackConfig, PlaybackController, PlaybackState, StepOutcome};
pub use error::{PlaybackError, ViewError};
pub use surface::{IntentSender, PlayerIntent, PlayerSurface, PlayerView};
pub use timer::{Clock, ManualClock, SystemClock};
pub use view::{share, SharedView, View};
