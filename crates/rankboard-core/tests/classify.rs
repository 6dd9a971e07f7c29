mod common;

use chrono::NaiveDate;
use common::posts;
use rankboard_core::classify::{DEFAULT_DATE_SAMPLE, classify_columns_with};
use rankboard_core::{ColumnKind, Dataset, Value, classify_columns};

#[test]
fn partitions_the_posts_table() {
    let schema = classify_columns(&posts());
    assert_eq!(schema.numeric().collect::<Vec<_>>(), ["pageviews"]);
    assert_eq!(schema.date_like().collect::<Vec<_>>(), ["published"]);
    assert_eq!(
        schema.categorical().collect::<Vec<_>>(),
        ["site", "manager", "category"]
    );
    // Column order is preserved.
    let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["site", "manager", "category", "pageviews", "published"]);
}

#[test]
fn typed_dates_and_missing_cells() {
    let d = |m, day| Value::Date(NaiveDate::from_ymd_opt(2025, m, day).unwrap());
    let ds = Dataset::new(
        vec!["when".into(), "amount".into(), "note".into()],
        vec![
            vec![d(1, 5), Value::Int(3), Value::Empty],
            vec![Value::Empty, Value::Number(2.5), Value::from("")],
            vec![d(2, 9), Value::Empty, Value::Empty],
        ],
    )
    .unwrap();
    let schema = classify_columns(&ds);
    assert_eq!(schema.kind_of("when"), Some(ColumnKind::DateLike));
    assert_eq!(schema.kind_of("amount"), Some(ColumnKind::Numeric));
    assert_eq!(schema.kind_of("note"), Some(ColumnKind::Categorical));
    assert_eq!(schema.kind_of("missing"), None);
}

#[test]
fn day_first_text_dates_are_date_like() {
    let ds = Dataset::from_records([
        [("data", Value::from("31/12/2024"))],
        [("data", Value::from("01/01/2025"))],
    ]);
    assert_eq!(
        classify_columns(&ds).kind_of("data"),
        Some(ColumnKind::DateLike)
    );
}

#[test]
fn one_stray_text_value_makes_a_column_categorical() {
    let ds = Dataset::from_records([
        [("v", Value::Int(1))],
        [("v", Value::from("n/a"))],
        [("v", Value::Int(3))],
    ]);
    assert_eq!(
        classify_columns(&ds).kind_of("v"),
        Some(ColumnKind::Categorical)
    );
}

#[test]
fn numeric_wins_over_date_for_plain_numbers() {
    let ds = Dataset::from_records([[("n", Value::from("20240101"))], [("n", Value::from("20240102"))]]);
    assert_eq!(classify_columns(&ds).kind_of("n"), Some(ColumnKind::Numeric));
}

#[test]
fn date_detection_only_samples_leading_values() {
    let mut records: Vec<[(&str, Value); 1]> = (1..=DEFAULT_DATE_SAMPLE as u32)
        .map(|d| [("d", Value::from(format!("2025-03-{d:02}")))])
        .collect();
    records.push([("d", Value::from("later garbage"))]);
    let ds = Dataset::from_records(records);
    assert_eq!(classify_columns(&ds).kind_of("d"), Some(ColumnKind::DateLike));
    assert_eq!(
        classify_columns_with(&ds, DEFAULT_DATE_SAMPLE + 1).kind_of("d"),
        Some(ColumnKind::Categorical)
    );
}

#[test]
fn empty_dataset_has_empty_schema() {
    assert!(classify_columns(&Dataset::default()).is_empty());
}
