use super::loader::{load_csv, DatasetError};
use super::table::Cell;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_csv_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forms.csv");
    fs::write(
        &path,
        "weekly_study_hours,school_type,dropped_out\n10,public,0\n2.5,,1\n",
    )
    .unwrap();

    let table = load_csv(&path).unwrap();
    assert_eq!(table.n_rows(), 2);
    assert_eq!(table.n_cols(), 3);
    assert_eq!(
        table.column_names(),
        vec!["weekly_study_hours", "school_type", "dropped_out"]
    );

    let hours = table.column("weekly_study_hours").unwrap();
    assert_eq!(hours.values, vec![Cell::Number(10.0), Cell::Number(2.5)]);

    let school = table.column("school_type").unwrap();
    assert_eq!(
        school.values,
        vec![Cell::Text("public".to_string()), Cell::Missing]
    );
}

#[test]
fn test_load_csv_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv");

    let err = load_csv(&path).unwrap_err();
    match err {
        DatasetError::NotFound(p) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other}"),
    }
}

#[test]
fn test_load_csv_header_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "a,b,dropped_out\n").unwrap();

    let table = load_csv(&path).unwrap();
    assert_eq!(table.n_rows(), 0);
    assert_eq!(table.n_cols(), 3);
}
