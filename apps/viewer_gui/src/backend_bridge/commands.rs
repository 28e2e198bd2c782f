//! Commands queued from the UI to the loader worker.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const ABUNDANCE_SUFFIX: &str = "ticks.csv";
const TRANSLOG_SUFFIX: &str = "transLog_NP.txt";

/// The pair of files making up one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationFiles {
    pub abundance: PathBuf,
    pub transitions: Option<PathBuf>,
}

impl SimulationFiles {
    /// Picks the abundance table and transition log out of a multi-file
    /// selection by their file-name suffixes. A lone file is taken as the
    /// abundance table.
    pub fn from_selection(paths: &[PathBuf]) -> Option<Self> {
        let abundance = paths
            .iter()
            .find(|path| has_suffix(path, ABUNDANCE_SUFFIX))
            .or_else(|| match paths {
                [only] => Some(only),
                _ => None,
            })?
            .clone();
        let transitions = paths
            .iter()
            .find(|path| has_suffix(path, TRANSLOG_SUFFIX))
            .cloned();

        Some(Self {
            abundance,
            transitions,
        })
    }
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderCommand {
    Load(SimulationFiles),
}

impl LoaderCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LoaderCommand::Load(_) => "load",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_both_files_out_of_a_multi_selection() {
        let paths = vec![
            PathBuf::from("/runs/42_transLog_NP.txt"),
            PathBuf::from("/runs/notes.txt"),
            PathBuf::from("/runs/42_ticks.csv"),
        ];
        let files = SimulationFiles::from_selection(&paths).expect("files");

        assert_eq!(files.abundance, PathBuf::from("/runs/42_ticks.csv"));
        assert_eq!(files.transitions, Some(PathBuf::from("/runs/42_transLog_NP.txt")));
    }

    #[test]
    fn single_file_is_taken_as_the_abundance_table() {
        let files = SimulationFiles::from_selection(&[PathBuf::from("/runs/table.tsv")])
            .expect("files");
        assert_eq!(files.abundance, PathBuf::from("/runs/table.tsv"));
        assert_eq!(files.transitions, None);
    }

    #[test]
    fn selection_without_an_abundance_table_is_rejected() {
        let paths = vec![
            PathBuf::from("/runs/42_transLog_NP.txt"),
            PathBuf::from("/runs/other.txt"),
        ];
        assert_eq!(SimulationFiles::from_selection(&paths), None);
        assert_eq!(SimulationFiles::from_selection(&[]), None);
    }
}
