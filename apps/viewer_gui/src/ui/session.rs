//! One loaded simulation: its views and the playback controller driving them.

use std::time::Instant;

use playback::{IntentSender, PlaybackController, PlaybackError, PlayerIntent, PlayerView};
use shared::{domain::SimulationData, settings::ViewerSettings};
use views::ViewSet;

use crate::backend_bridge::commands::SimulationFiles;

pub struct Session {
    files: SimulationFiles,
    views: ViewSet,
    controller: PlaybackController<PlayerView>,
    buttons: IntentSender,
}

impl Session {
    pub fn start(
        files: SimulationFiles,
        data: &SimulationData,
        settings: &ViewerSettings,
    ) -> Result<Self, PlaybackError> {
        let views = ViewSet::assemble(data, settings);
        let surface = PlayerView::new(data.max_ticks());
        let buttons = surface.intents();
        let controller = PlaybackController::new(views.playback_config(data, settings), surface)?;
        tracing::info!(
            abundance = %files.abundance.display(),
            views = views.len(),
            max_ticks = data.max_ticks(),
            "session started"
        );

        Ok(Self {
            files,
            views,
            controller,
            buttons,
        })
    }

    pub fn files(&self) -> &SimulationFiles {
        &self.files
    }

    pub fn views(&self) -> &ViewSet {
        &self.views
    }

    pub fn surface(&self) -> &PlayerView {
        self.controller.surface()
    }

    pub fn request(&self, intent: PlayerIntent) {
        self.buttons.send(intent);
    }

    /// Applies queued button presses and due timer firings, then drops
    /// landed agent flights. Returns whether anything is still animating.
    pub fn advance(&mut self, now: Instant) -> Result<bool, PlaybackError> {
        self.controller.update()?;
        let airborne = match &self.views.diagram {
            Some(diagram) => diagram
                .try_borrow_mut()
                .map(|mut diagram| diagram.prune_flights(now))
                .unwrap_or(0),
            None => 0,
        };
        Ok(airborne > 0)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }
}
