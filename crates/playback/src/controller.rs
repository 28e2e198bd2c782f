use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use shared::domain::TickIndex;
use tracing::{debug, error, info};

use crate::{
    error::PlaybackError,
    surface::{PlayerIntent, PlayerSurface},
    timer::{Clock, IntervalTimer, SystemClock},
    view::SharedView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Every view was ticked at this index.
    Advanced(TickIndex),
    /// The bound was reached; playback is stopped and no view was ticked.
    Finished,
}

pub struct PlaybackConfig {
    /// Ticked and reset in this order, every cycle.
    pub views: Vec<SharedView>,
    pub interval: Duration,
    pub max_ticks: usize,
}

/// Owns the tick counter and the only timer; fans each tick out to the views.
///
/// Single-threaded: intents and timer firings are both handled from
/// [`PlaybackController::update`], so they never interleave.
pub struct PlaybackController<S: PlayerSurface, C: Clock = SystemClock> {
    views: Vec<SharedView>,
    interval: Duration,
    max_ticks: usize,
    current_tick: TickIndex,
    timer: Option<IntervalTimer>,
    surface: S,
    intents: Receiver<PlayerIntent>,
    clock: C,
}

impl<S: PlayerSurface> PlaybackController<S> {
    pub fn new(config: PlaybackConfig, surface: S) -> Result<Self, PlaybackError> {
        Self::with_clock(config, surface, SystemClock)
    }
}

impl<S: PlayerSurface, C: Clock> PlaybackController<S, C> {
    pub fn with_clock(
        config: PlaybackConfig,
        mut surface: S,
        clock: C,
    ) -> Result<Self, PlaybackError> {
        if config.interval.is_zero() {
            return Err(PlaybackError::InvalidInterval);
        }
        let intents = surface.subscribe();
        debug!(
            views = config.views.len(),
            max_ticks = config.max_ticks,
            interval_ms = config.interval.as_millis() as u64,
            "playback controller ready"
        );
        Ok(Self {
            views: config.views,
            interval: config.interval,
            max_ticks: config.max_ticks,
            current_tick: 0,
            timer: None,
            surface,
            intents,
            clock,
        })
    }

    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn current_tick(&self) -> TickIndex {
        self.current_tick
    }

    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// When the running timer fires next; `None` while stopped.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(IntervalTimer::next_due)
    }

    /// Starts the timer. A second call while playing is a no-op, so at most
    /// one timer ever exists.
    pub fn play(&mut self) {
        if self.timer.is_some() {
            debug!(tick = self.current_tick, "play ignored: already playing");
            return;
        }
        self.surface.set_state_playing();
        self.timer = Some(IntervalTimer::start(self.clock.now(), self.interval));
        debug!(tick = self.current_tick, "playback started");
    }

    /// Cancels the timer synchronously. Safe while already stopped.
    pub fn pause(&mut self) {
        self.surface.set_state_stopped();
        if self.timer.take().is_some() {
            debug!(tick = self.current_tick, "playback paused");
        }
    }

    /// Reports the current tick, then either stops at the bound or ticks every
    /// view at the current index and advances.
    pub fn step(&mut self) -> Result<StepOutcome, PlaybackError> {
        self.surface.set_ticks(self.current_tick);
        if self.current_tick >= self.max_ticks {
            self.pause();
            return Ok(StepOutcome::Finished);
        }

        let tick = self.current_tick;
        if let Err(err) = self.tick_views(tick) {
            self.pause();
            error!(tick, "view failed, playback halted: {err}");
            return Err(err);
        }
        self.current_tick += 1;

        if self.current_tick >= self.max_ticks {
            self.surface.set_ticks(self.current_tick);
            self.pause();
            info!(max_ticks = self.max_ticks, "playback reached the last tick");
        }
        Ok(StepOutcome::Advanced(tick))
    }

    /// Pause, rewind to tick 0, then reset every view in registration order.
    pub fn reset(&mut self) -> Result<(), PlaybackError> {
        self.pause();
        self.current_tick = 0;
        self.surface.set_ticks(0);

        for (index, view) in self.views.iter().enumerate() {
            let mut view = view
                .try_borrow_mut()
                .map_err(|_| PlaybackError::ViewBusy { index })?;
            view.reset().map_err(|source| {
                error!(index, "view failed to reset: {source}");
                PlaybackError::View {
                    index,
                    tick: None,
                    source,
                }
            })?;
        }
        debug!("playback reset");
        Ok(())
    }

    pub fn handle_intent(&mut self, intent: PlayerIntent) -> Result<(), PlaybackError> {
        debug!(intent = intent.name(), "handling player intent");
        match intent {
            PlayerIntent::Play => self.play(),
            PlayerIntent::Pause => self.pause(),
            PlayerIntent::Reset => self.reset()?,
            PlayerIntent::Step => {
                self.step()?;
            }
        }
        Ok(())
    }

    /// Drains pending intents, then fires the timer at most once if it is due.
    /// Intents go first, so a pause or reset queued before a due firing wins.
    pub fn update(&mut self) -> Result<(), PlaybackError> {
        while let Ok(intent) = self.intents.try_recv() {
            self.handle_intent(intent)?;
        }

        let now = self.clock.now();
        let due = self
            .timer
            .as_mut()
            .is_some_and(|timer| timer.fire_if_due(now));
        if due {
            self.step()?;
        }
        Ok(())
    }

    fn tick_views(&self, tick: TickIndex) -> Result<(), PlaybackError> {
        for (index, view) in self.views.iter().enumerate() {
            let mut view = view
                .try_borrow_mut()
                .map_err(|_| PlaybackError::ViewBusy { index })?;
            view.tick(tick).map_err(|source| PlaybackError::View {
                index,
                tick: Some(tick),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
