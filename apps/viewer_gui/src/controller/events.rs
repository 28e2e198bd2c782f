//! UI/worker events and error modeling for the viewer shell.

use loader::LoadError;
use playback::PlaybackError;
use shared::domain::SimulationData;

use crate::backend_bridge::commands::SimulationFiles;

pub enum UiEvent {
    Info(String),
    SimulationLoaded {
        files: SimulationFiles,
        data: SimulationData,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Selection,
    Io,
    Format,
    Playback,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    Load,
    Playback,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Selection => "File selection",
        UiErrorCategory::Io => "File access",
        UiErrorCategory::Format => "Data format",
        UiErrorCategory::Playback => "Playback",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classifies free-form messages that have no typed source: worker
    /// startup failures and rejected file selections.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.starts_with("select ") {
            UiErrorCategory::Selection
        } else if message_lower.contains("startup failure")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Io
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status-line text, prefixed with the category label.
    pub fn status_text(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }

    /// Load and playback failures end the current session and get a banner.
    pub fn needs_banner(&self) -> bool {
        matches!(
            self.context,
            UiErrorContext::WorkerStartup | UiErrorContext::Load | UiErrorContext::Playback
        )
    }
}

impl From<&LoadError> for UiError {
    fn from(err: &LoadError) -> Self {
        let category = match err {
            LoadError::Io { .. } => UiErrorCategory::Io,
            LoadError::Parse { .. }
            | LoadError::InvalidNumber { .. }
            | LoadError::InvalidTick { .. }
            | LoadError::MissingColumn { .. }
            | LoadError::Empty { .. }
            | LoadError::Data { .. } => UiErrorCategory::Format,
        };
        Self {
            category,
            context: UiErrorContext::Load,
            message: err.to_string(),
        }
    }
}

impl From<&PlaybackError> for UiError {
    fn from(err: &PlaybackError) -> Self {
        Self {
            category: UiErrorCategory::Playback,
            context: UiErrorContext::Playback,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use playback::ViewError;

    use super::*;

    #[test]
    fn load_errors_map_by_variant() {
        let io = UiError::from(&LoadError::Io {
            path: PathBuf::from("/runs/a_ticks.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        });
        assert_eq!(io.category(), UiErrorCategory::Io);
        assert_eq!(io.context(), UiErrorContext::Load);
        assert!(io.needs_banner());

        let format = UiError::from(&LoadError::InvalidNumber {
            path: PathBuf::from("/runs/a_ticks.csv"),
            row: 3,
            column: "AvMicResistance".into(),
            value: "abc".into(),
        });
        assert_eq!(format.category(), UiErrorCategory::Format);
        assert!(format.status_text().starts_with("Data format error:"));
    }

    #[test]
    fn view_failures_are_playback_whatever_their_text() {
        let err = UiError::from(&PlaybackError::View {
            index: 2,
            tick: Some(4),
            source: ViewError::Render("expected 3 points".into()),
        });
        assert_eq!(err.category(), UiErrorCategory::Playback);
        assert_eq!(err.context(), UiErrorContext::Playback);
        assert_eq!(
            err.message(),
            "view #2 failed at tick 4: render failure: expected 3 points"
        );
    }

    #[test]
    fn worker_startup_failure_is_reported_as_io() {
        let err = UiError::from_message(
            UiErrorContext::WorkerStartup,
            "loader worker startup failure: failed to build runtime: out of threads",
        );
        assert_eq!(err.category(), UiErrorCategory::Io);
        assert!(err.needs_banner());
    }

    #[test]
    fn rejected_file_selection_is_reported_without_a_banner() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "select the abundance table (*ticks.csv)",
        );
        assert_eq!(err.category(), UiErrorCategory::Selection);
        assert!(!err.needs_banner());
    }

    #[test]
    fn general_messages_stay_off_the_banner() {
        let err = UiError::from_message(UiErrorContext::General, "something odd");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert!(!err.needs_banner());
        assert_eq!(err.message(), "something odd");
    }
}
