//! Loads simulation output (abundance table + optional transition log) into
//! the in-memory tick data model. Both files are tab-separated with a header row.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::{
    domain::{Abundance, AbundanceSample, SimulationData, TransitionEvent, TransitionLog},
    error::DataError,
};
use thiserror::Error;
use tracing::{info, warn};

pub const TICKS_COLUMN: &str = "Ticks";
pub const FROM_CLASS_COLUMN: &str = "TransFromClass";
pub const TO_CLASS_COLUMN: &str = "TransToClass";
/// Marker in `TransFromClass` for rows that are not real transitions.
pub const NOT_A_STATE: &str = "NA";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed table '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("'{}' row {row}, column '{column}': '{value}' is not a number", .path.display())]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    #[error("'{}' row {row}: '{value}' is not a valid tick", .path.display())]
    InvalidTick {
        path: PathBuf,
        row: usize,
        value: String,
    },
    #[error("'{}' is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("'{}' contains no data rows", .path.display())]
    Empty { path: PathBuf },
    #[error("'{}': {source}", .path.display())]
    Data {
        path: PathBuf,
        #[source]
        source: DataError,
    },
}

fn tsv_reader(raw: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes())
}

fn parse_cell(value: &str) -> Option<f64> {
    match value {
        "" | "NA" | "NaN" => Some(f64::NAN),
        other => other.parse::<f64>().ok(),
    }
}

fn parse_tick(value: &str) -> Option<usize> {
    if let Ok(tick) = value.parse::<usize>() {
        return Some(tick);
    }
    let float = value.parse::<f64>().ok()?;
    (float.is_finite() && float >= 0.0 && float.fract() == 0.0).then_some(float as usize)
}

/// Parses an abundance table: one row per tick, every cell numeric.
pub fn parse_abundance(path: &Path, raw: &str) -> Result<Abundance, LoadError> {
    let parse_err = |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = tsv_reader(raw);
    let columns: Vec<String> = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut samples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(parse_err)?;
        let values = record
            .iter()
            .zip(&columns)
            .map(|(value, column)| {
                parse_cell(value).ok_or_else(|| LoadError::InvalidNumber {
                    path: path.to_path_buf(),
                    row,
                    column: column.clone(),
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        samples.push(AbundanceSample { values });
    }

    if samples.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Abundance::new(columns, samples).map_err(|source| LoadError::Data {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a transition log, dropping `NA` sources and self-transitions.
pub fn parse_transitions(path: &Path, raw: &str) -> Result<Vec<TransitionEvent>, LoadError> {
    let parse_err = |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = tsv_reader(raw);
    let headers = reader.headers().map_err(parse_err)?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })
    };
    let tick_idx = column(TICKS_COLUMN)?;
    let from_idx = column(FROM_CLASS_COLUMN)?;
    let to_idx = column(TO_CLASS_COLUMN)?;

    let mut events = Vec::new();
    let mut self_transitions = 0usize;
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(parse_err)?;
        let from = record.get(from_idx).unwrap_or_default();
        if from == NOT_A_STATE {
            continue;
        }
        let to = record.get(to_idx).unwrap_or_default();
        let raw_tick = record.get(tick_idx).unwrap_or_default();
        let tick = parse_tick(raw_tick).ok_or_else(|| LoadError::InvalidTick {
            path: path.to_path_buf(),
            row,
            value: raw_tick.to_string(),
        })?;

        let event = TransitionEvent::new(tick, from, to);
        if event.is_self_transition() {
            self_transitions += 1;
            continue;
        }
        events.push(event);
    }

    if self_transitions > 0 {
        tracing::debug!(
            path = %path.display(),
            count = self_transitions,
            "dropped self-transitions"
        );
    }
    Ok(events)
}

async fn read_file(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub async fn load_abundance(path: &Path) -> Result<Abundance, LoadError> {
    let raw = read_file(path).await?;
    parse_abundance(path, &raw)
}

/// `Ok(None)` when no log was supplied; a missing log is not an error.
pub async fn load_transition_events(
    path: Option<&Path>,
) -> Result<Option<Vec<TransitionEvent>>, LoadError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = read_file(path).await?;
    parse_transitions(path, &raw).map(Some)
}

/// Loads both files concurrently. Any failure aborts the whole load.
pub async fn load_simulation(
    abundance_path: &Path,
    transitions_path: Option<&Path>,
) -> Result<SimulationData, LoadError> {
    let (abundance, events) = tokio::try_join!(
        load_abundance(abundance_path),
        load_transition_events(transitions_path),
    )?;

    let max_ticks = abundance.len();
    let transitions = events.map(|events| {
        let (log, dropped) = TransitionLog::group(events, max_ticks);
        if dropped > 0 {
            warn!(
                dropped,
                max_ticks, "transition events past the last abundance tick were dropped"
            );
        }
        Arc::new(log)
    });

    info!(
        abundance = %abundance_path.display(),
        max_ticks,
        columns = abundance.columns().len(),
        transitions = transitions.as_ref().map_or(0, |log| log.total_events()),
        "simulation loaded"
    );

    Ok(SimulationData {
        abundance: Arc::new(abundance),
        transitions,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
