use super::*;

fn path() -> PathBuf {
    PathBuf::from("fixture.tsv")
}

#[test]
fn parses_abundance_rows_in_order() {
    let raw = "Healthy\tInfected\tpGetInfectedTown\n100\t1\t0.25\n99\t2\t0.5\n";

    let abundance = parse_abundance(&path(), raw).expect("abundance");

    assert_eq!(abundance.columns(), ["Healthy", "Infected", "pGetInfectedTown"]);
    assert_eq!(abundance.len(), 2);
    assert_eq!(abundance.value(1, "pGetInfectedTown"), Some(0.5));
}

#[test]
fn na_and_empty_cells_become_nan() {
    let raw = "a\tb\n1\tNA\n\t3\n";

    let abundance = parse_abundance(&path(), raw).expect("abundance");

    assert!(abundance.value(0, "b").expect("cell").is_nan());
    assert!(abundance.value(1, "a").expect("cell").is_nan());
    assert_eq!(abundance.value(1, "b"), Some(3.0));
}

#[test]
fn rejects_non_numeric_abundance_cells() {
    let raw = "a\tb\n1\t2\n3\tlots\n";

    let err = parse_abundance(&path(), raw).expect_err("invalid number");

    match err {
        LoadError::InvalidNumber {
            row, column, value, ..
        } => {
            assert_eq!(row, 1);
            assert_eq!(column, "b");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_only_abundance_is_empty_error() {
    let err = parse_abundance(&path(), "a\tb\n").expect_err("empty");
    assert!(matches!(err, LoadError::Empty { .. }));
}

#[test]
fn ragged_abundance_rows_are_parse_errors() {
    let err = parse_abundance(&path(), "a\tb\n1\t2\n3\n").expect_err("ragged");
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[test]
fn transition_log_drops_na_sources_and_self_transitions() {
    let raw = "Ticks\tAgent\tTransFromClass\tTransToClass\n\
               0\t1\tNA\ttownHealthyPersons\n\
               0\t2\ttownHealthyPersons\ttownIncPerPersons\n\
               1\t3\ttownIncPerPersons\ttownIncPerPersons\n\
               2.0\t4\ttownIncPerPersons\thospAntTrPersons\n";

    let events = parse_transitions(&path(), raw).expect("events");

    assert_eq!(
        events,
        vec![
            TransitionEvent::new(0, "townHealthyPersons", "townIncPerPersons"),
            TransitionEvent::new(2, "townIncPerPersons", "hospAntTrPersons"),
        ]
    );
}

#[test]
fn transition_log_requires_known_columns() {
    let err = parse_transitions(&path(), "Ticks\tFrom\tTo\n0\ta\tb\n").expect_err("columns");
    assert!(matches!(
        err,
        LoadError::MissingColumn {
            column: FROM_CLASS_COLUMN,
            ..
        }
    ));
}

#[test]
fn fractional_ticks_are_rejected() {
    let raw = "Ticks\tTransFromClass\tTransToClass\n1.5\ta\tb\n";
    let err = parse_transitions(&path(), raw).expect_err("tick");
    assert!(matches!(err, LoadError::InvalidTick { row: 0, .. }));
}

#[tokio::test]
async fn missing_transition_log_is_absent_not_error() {
    let events = load_transition_events(None).await.expect("no log");
    assert!(events.is_none());
}

#[tokio::test]
async fn unreadable_file_reports_path() {
    let missing = std::env::temp_dir().join("vera_viewer_missing_abundance_ticks.csv");
    let err = load_abundance(&missing).await.expect_err("missing file");

    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("vera_viewer_missing_abundance_ticks.csv"));
}
