use std::{
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

use playback::{Clock, SystemClock, View, ViewError};
use shared::domain::{TickIndex, TransitionLog};

use crate::catalogue::{StateCatalogue, StateOccupancy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDiagramOptions {
    pub animate_agents: bool,
    pub animate_states: bool,
    pub transition_duration: Duration,
}

impl Default for StateDiagramOptions {
    fn default() -> Self {
        Self {
            animate_agents: true,
            animate_states: true,
            transition_duration: Duration::from_millis(500),
        }
    }
}

/// One agent travelling from its old state to its new one. Launched by
/// `tick` and left to expire on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentFlight {
    pub from: usize,
    pub to: usize,
    pub launched_at: Instant,
    pub delay: Duration,
    pub duration: Duration,
}

impl AgentFlight {
    /// Fraction of the trip covered at `now`, or `None` once it has landed.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let elapsed = now.saturating_duration_since(self.launched_at);
        if elapsed < self.delay {
            return Some(0.0);
        }
        let travelled = elapsed - self.delay;
        if travelled >= self.duration {
            return None;
        }
        Some(travelled.as_secs_f32() / self.duration.as_secs_f32())
    }
}

pub struct StateDiagramView {
    catalogue: Arc<StateCatalogue>,
    transitions: Arc<TransitionLog>,
    options: StateDiagramOptions,
    occupancy: StateOccupancy,
    flights: Vec<AgentFlight>,
    clock: Rc<dyn Clock>,
}

impl StateDiagramView {
    pub fn new(
        catalogue: Arc<StateCatalogue>,
        transitions: Arc<TransitionLog>,
        options: StateDiagramOptions,
    ) -> Self {
        Self::with_clock(catalogue, transitions, options, Rc::new(SystemClock))
    }

    /// Flights are stamped with `clock`; share it with the controller to keep
    /// animation time and tick time on the same source.
    pub fn with_clock(
        catalogue: Arc<StateCatalogue>,
        transitions: Arc<TransitionLog>,
        options: StateDiagramOptions,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let occupancy = StateOccupancy::new(&catalogue);
        Self {
            catalogue,
            transitions,
            options,
            occupancy,
            flights: Vec::new(),
            clock,
        }
    }

    pub fn catalogue(&self) -> &StateCatalogue {
        &self.catalogue
    }

    pub fn options(&self) -> StateDiagramOptions {
        self.options
    }

    pub fn counts(&self) -> &[u64] {
        self.occupancy.counts()
    }

    pub fn flights(&self) -> &[AgentFlight] {
        &self.flights
    }

    /// Drops flights that have landed by `now`; returns how many are still airborne.
    pub fn prune_flights(&mut self, now: Instant) -> usize {
        self.flights.retain(|flight| flight.progress(now).is_some());
        self.flights.len()
    }

    fn launch(&mut self, moves: &[(usize, usize)]) {
        let now = self.clock.now();
        self.prune_flights(now);
        // Stagger departures across the first tenth of the transition.
        let spread = self.options.transition_duration / 10;
        let count = moves.len().max(1) as u32;
        self.flights
            .extend(moves.iter().enumerate().map(|(i, &(from, to))| AgentFlight {
                from,
                to,
                launched_at: now,
                delay: spread * i as u32 / count,
                duration: self.options.transition_duration,
            }));
    }
}

impl View for StateDiagramView {
    fn tick(&mut self, tick: TickIndex) -> Result<(), ViewError> {
        let events = self
            .transitions
            .slot(tick)
            .ok_or(ViewError::TickOutOfRange {
                tick,
                len: self.transitions.len(),
            })?;
        let moves = self.catalogue.resolve(events)?;

        self.occupancy.apply(&moves);
        if self.options.animate_agents {
            self.launch(&moves);
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ViewError> {
        self.occupancy.reset();
        self.flights.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/state_diagram_tests.rs"]
mod tests;
