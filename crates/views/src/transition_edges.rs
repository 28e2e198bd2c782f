use std::{collections::HashMap, sync::Arc};

use playback::{View, ViewError};
use shared::domain::{TickIndex, TransitionLog};

use crate::catalogue::{StateCatalogue, StateOccupancy};

/// Directed edge between two distinct states with its per-tick event counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    history: Vec<u32>,
}

impl Edge {
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Transitions along this edge over the last `window` ticks.
    pub fn weight(&self, window: usize) -> u32 {
        self.history.iter().rev().take(window).sum()
    }
}

pub struct TransitionEdgesView {
    catalogue: Arc<StateCatalogue>,
    transitions: Arc<TransitionLog>,
    window: usize,
    edges: Vec<Edge>,
    lookup: HashMap<(usize, usize), usize>,
    occupancy: StateOccupancy,
}

impl TransitionEdgesView {
    pub fn new(
        catalogue: Arc<StateCatalogue>,
        transitions: Arc<TransitionLog>,
        window: usize,
    ) -> Self {
        let n = catalogue.len();
        let edges: Vec<Edge> = (0..n)
            .flat_map(|source| (0..n).map(move |target| (source, target)))
            .filter(|(source, target)| source != target)
            .map(|(source, target)| Edge {
                source,
                target,
                history: Vec::new(),
            })
            .collect();
        let lookup = edges
            .iter()
            .enumerate()
            .map(|(i, edge)| ((edge.source, edge.target), i))
            .collect();
        let occupancy = StateOccupancy::new(&catalogue);

        Self {
            catalogue,
            transitions,
            window,
            edges,
            lookup,
            occupancy,
        }
    }

    pub fn catalogue(&self) -> &StateCatalogue {
        &self.catalogue
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn weight(&self, edge: &Edge) -> u32 {
        edge.weight(self.window)
    }

    pub fn counts(&self) -> &[u64] {
        self.occupancy.counts()
    }
}

impl View for TransitionEdgesView {
    fn tick(&mut self, tick: TickIndex) -> Result<(), ViewError> {
        let events = self
            .transitions
            .slot(tick)
            .ok_or(ViewError::TickOutOfRange {
                tick,
                len: self.transitions.len(),
            })?;
        let moves = self.catalogue.resolve(events)?;

        let mut in_tick = vec![0u32; self.edges.len()];
        for pair in &moves {
            if let Some(&i) = self.lookup.get(pair) {
                in_tick[i] += 1;
            }
        }
        for (edge, count) in self.edges.iter_mut().zip(in_tick) {
            edge.history.push(count);
        }
        self.occupancy.apply(&moves);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ViewError> {
        for edge in &mut self.edges {
            edge.history.clear();
        }
        self.occupancy.reset();
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transition_edges_tests.rs"]
mod tests;
