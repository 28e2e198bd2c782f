use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Zero-based simulation step. Valid indices are `0..max_ticks`.
pub type TickIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub tick: TickIndex,
    pub old_state: String,
    pub new_state: String,
}

impl TransitionEvent {
    pub fn new(tick: TickIndex, old_state: impl Into<String>, new_state: impl Into<String>) -> Self {
        Self {
            tick,
            old_state: old_state.into(),
            new_state: new_state.into(),
        }
    }

    pub fn is_self_transition(&self) -> bool {
        self.old_state == self.new_state
    }
}

/// One row of the abundance table. Values are positional; the owning
/// [`Abundance`] carries the column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbundanceSample {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Abundance {
    columns: Vec<String>,
    samples: Vec<AbundanceSample>,
}

impl Abundance {
    pub fn new(columns: Vec<String>, samples: Vec<AbundanceSample>) -> Result<Self, DataError> {
        for (row, sample) in samples.iter().enumerate() {
            if sample.values.len() != columns.len() {
                return Err(DataError::RowWidth {
                    row,
                    expected: columns.len(),
                    actual: sample.values.len(),
                });
            }
        }
        Ok(Self { columns, samples })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn samples(&self) -> &[AbundanceSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn value(&self, tick: TickIndex, column: &str) -> Option<f64> {
        let index = self.column_index(column)?;
        self.samples.get(tick).map(|sample| sample.values[index])
    }

    pub fn first(&self) -> Option<&AbundanceSample> {
        self.samples.first()
    }
}

/// Transition events bucketed by tick: exactly one (possibly empty) slot per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionLog {
    slots: Vec<Vec<TransitionEvent>>,
}

impl TransitionLog {
    /// Buckets `events` into `max_ticks` slots, keeping input order within a
    /// slot. Returns the log and the number of events dropped for lying past
    /// the last tick.
    pub fn group(events: impl IntoIterator<Item = TransitionEvent>, max_ticks: usize) -> (Self, usize) {
        let mut slots = vec![Vec::new(); max_ticks];
        let mut dropped = 0;
        for event in events {
            match slots.get_mut(event.tick) {
                Some(slot) => slot.push(event),
                None => dropped += 1,
            }
        }
        (Self { slots }, dropped)
    }

    pub fn slot(&self, tick: TickIndex) -> Option<&[TransitionEvent]> {
        self.slots.get(tick).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_events(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }
}

/// Everything the combined load produces before playback can start.
#[derive(Debug, Clone)]
pub struct SimulationData {
    pub abundance: Arc<Abundance>,
    /// `None` when no transition log was supplied; views that need events
    /// must then be left out of the active set.
    pub transitions: Option<Arc<TransitionLog>>,
}

impl SimulationData {
    pub fn max_ticks(&self) -> usize {
        self.abundance.len()
    }
}
