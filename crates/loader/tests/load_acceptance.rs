use std::fs;

use loader::{load_simulation, LoadError};

const ABUNDANCE: &str = "HealthyPersonsInTown\tIncPeriodPersonsInTown\tpGetInfectedTown\n\
                         100\t0\t0.1\n\
                         99\t1\t0.2\n\
                         98\t2\t0.3\n";

const TRANSLOG: &str = "Ticks\tTransFromClass\tTransToClass\n\
                        0\tNA\ttownHealthyPersons\n\
                        1\ttownHealthyPersons\ttownIncPerPersons\n\
                        2\ttownHealthyPersons\ttownIncPerPersons\n\
                        2\ttownIncPerPersons\ttownHealthyPersons\n\
                        9\ttownHealthyPersons\ttownIncPerPersons\n";

#[tokio::test]
async fn loads_abundance_and_groups_transitions_per_tick() {
    let dir = tempfile::tempdir().expect("temp dir");
    let abundance_path = dir.path().join("run_ticks.csv");
    let translog_path = dir.path().join("run_transLog_NP.txt");
    fs::write(&abundance_path, ABUNDANCE).expect("write abundance");
    fs::write(&translog_path, TRANSLOG).expect("write translog");

    let data = load_simulation(&abundance_path, Some(&translog_path))
        .await
        .expect("load");

    assert_eq!(data.max_ticks(), 3);
    let transitions = data.transitions.expect("transition log");
    assert_eq!(transitions.len(), 3);
    assert_eq!(transitions.slot(0).map(<[_]>::len), Some(0));
    assert_eq!(transitions.slot(1).map(<[_]>::len), Some(1));
    assert_eq!(transitions.slot(2).map(<[_]>::len), Some(2));
    assert_eq!(transitions.total_events(), 3);
}

#[tokio::test]
async fn loads_without_transition_log() {
    let dir = tempfile::tempdir().expect("temp dir");
    let abundance_path = dir.path().join("ticks.csv");
    fs::write(&abundance_path, ABUNDANCE).expect("write abundance");

    let data = load_simulation(&abundance_path, None).await.expect("load");

    assert_eq!(data.max_ticks(), 3);
    assert!(data.transitions.is_none());
}

#[tokio::test]
async fn broken_transition_log_aborts_the_whole_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let abundance_path = dir.path().join("ticks.csv");
    let translog_path = dir.path().join("transLog_NP.txt");
    fs::write(&abundance_path, ABUNDANCE).expect("write abundance");
    fs::write(&translog_path, "Ticks\tTransFromClass\n0\ta\n").expect("write translog");

    let err = load_simulation(&abundance_path, Some(&translog_path))
        .await
        .expect_err("must fail");

    assert!(matches!(err, LoadError::MissingColumn { .. }));
}
