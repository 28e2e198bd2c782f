use std::{collections::HashMap, f64::consts::PI};

use playback::ViewError;
use shared::{domain::{Abundance, TransitionEvent}, settings::StateSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct StateNode {
    /// Class name used in the transition log.
    pub name: String,
    /// Abundance column seeding the tick-0 count.
    pub column: String,
    pub description: String,
    /// Position on the unit square, laid out around a circle.
    pub x: f64,
    pub y: f64,
    pub initial_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct StateCatalogue {
    nodes: Vec<StateNode>,
    index: HashMap<String, usize>,
}

impl StateCatalogue {
    pub fn new(specs: &[StateSpec], abundance: &Abundance) -> Self {
        let step = if specs.is_empty() {
            0.0
        } else {
            2.0 * PI / specs.len() as f64
        };

        let nodes: Vec<StateNode> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let alpha = step * i as f64;
                StateNode {
                    name: spec.state.clone(),
                    column: spec.column.clone(),
                    description: spec.description.clone(),
                    x: alpha.cos() * 0.5 + 0.5,
                    y: alpha.sin() * 0.5 + 0.5,
                    initial_count: initial_count(abundance, &spec.column),
                }
            })
            .collect();

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.name.clone(), i))
            .collect();

        Self { nodes, index }
    }

    pub fn nodes(&self) -> &[StateNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, state: &str) -> Result<usize, ViewError> {
        self.index
            .get(state)
            .copied()
            .ok_or_else(|| ViewError::UnknownState {
                state: state.to_string(),
            })
    }

    /// Resolves every event up front so a tick is applied fully or not at all.
    pub fn resolve(&self, events: &[TransitionEvent]) -> Result<Vec<(usize, usize)>, ViewError> {
        events
            .iter()
            .map(|event| Ok((self.index_of(&event.old_state)?, self.index_of(&event.new_state)?)))
            .collect()
    }
}

fn initial_count(abundance: &Abundance, column: &str) -> u64 {
    match abundance.value(0, column) {
        Some(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
        Some(_) => 0,
        None => {
            tracing::warn!(column, "state column not found in abundance table; starting at 0");
            0
        }
    }
}

/// Running per-state counts derived from transition events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateOccupancy {
    counts: Vec<u64>,
    initial: Vec<u64>,
}

impl StateOccupancy {
    pub fn new(catalogue: &StateCatalogue) -> Self {
        let initial: Vec<u64> = catalogue.nodes().iter().map(|n| n.initial_count).collect();
        Self {
            counts: initial.clone(),
            initial,
        }
    }

    /// Moves one unit per transition; the source never drops below zero.
    pub fn apply(&mut self, moves: &[(usize, usize)]) {
        for &(from, to) in moves {
            self.counts[from] = self.counts[from].saturating_sub(1);
            self.counts[to] += 1;
        }
    }

    pub fn reset(&mut self) {
        self.counts.clone_from(&self.initial);
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}
