use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILE: &str = "viewer.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Area,
}

/// Maps an abundance column onto the class name used in the transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpec {
    pub column: String,
    pub state: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(default)]
    pub y_label: String,
    pub kind: ChartKind,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub transition_duration_ms: u64,
    pub interval_padding_ms: u64,
    pub edge_window_ticks: usize,
    pub states: Vec<StateSpec>,
    pub charts: Vec<ChartSpec>,
}

fn state(column: &str, state: &str, description: &str) -> StateSpec {
    StateSpec {
        column: column.into(),
        state: state.into(),
        description: description.into(),
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            transition_duration_ms: 500,
            interval_padding_ms: 50,
            edge_window_ticks: 10,
            states: vec![
                state(
                    "HealthyPersonsInTown",
                    "townHealthyPersons",
                    "Healthy person in town",
                ),
                state(
                    "IncPeriodPersonsInTown",
                    "townIncPerPersons",
                    "Person in incubation period",
                ),
                state(
                    "IncPeriodPersonsInTown2",
                    "townIncPerPersons2",
                    "Person in incubation period after wrong treatment",
                ),
                state(
                    "AntibioticTreatedPersonsInTown",
                    "townAntTrPersons",
                    "Person in AB treatment period at home",
                ),
                state(
                    "AntibioticTreatedPersonsInTown2",
                    "townAntTrPersons2",
                    "Person in AB wrong treatment period at home",
                ),
                state(
                    "InfectedPersonsInHospital",
                    "hospAntTrPersons",
                    "AB treatment in hospital",
                ),
                state(
                    "HealthyPersonsInHospital",
                    "healthyHospPeople",
                    "Healthy hospitalized",
                ),
            ],
            charts: vec![
                ChartSpec {
                    title: "Persons".into(),
                    y_label: "Persons".into(),
                    kind: ChartKind::Area,
                    columns: columns(&[
                        "InfectedPersonsInTown",
                        "IncPeriodPersonsInTown",
                        "IncPeriodPersonsInTown2",
                        "AntibioticTreatedPersonsInTown",
                        "AntibioticTreatedPersonsInTown2",
                        "InfectedPersonsInHospital",
                        "HealthyPersonsInHospital",
                    ]),
                },
                ChartSpec {
                    title: "Resistance related".into(),
                    y_label: String::new(),
                    kind: ChartKind::Line,
                    columns: columns(&["pGetInfectedTown", "AvMicResistance", "AvPathResistance"]),
                },
            ],
        }
    }
}

impl ViewerSettings {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Wall-clock period between ticks while playing.
    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
            .saturating_add(Duration::from_millis(self.interval_padding_ms))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_u64("VIEWER__TRANSITION_DURATION_MS") {
            self.transition_duration_ms = v;
        }
        if let Some(v) = env_u64("VIEWER__INTERVAL_PADDING_MS") {
            self.interval_padding_ms = v;
        }
        if let Some(v) = env_u64("VIEWER__EDGE_WINDOW_TICKS") {
            self.edge_window_ticks = v as usize;
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparsable override: {err}");
            None
        }
    }
}

/// Defaults, then the settings file, then `VIEWER__*` environment overrides.
///
/// An explicit path must exist and parse. Without one, `viewer.toml` in the
/// working directory is used when present.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<ViewerSettings> {
    let mut settings = match explicit {
        Some(path) => read_settings_file(path)?,
        None => {
            let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if fallback.exists() {
                read_settings_file(&fallback)?
            } else {
                ViewerSettings::default()
            }
        }
    };

    settings.apply_env_overrides();
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<ViewerSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let settings = toml::from_str::<ViewerSettings>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "loaded viewer settings");
    Ok(settings)
}
