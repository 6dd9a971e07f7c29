// Run with: `cargo test -p rankboard-io --features calamine --test calamine`

use std::path::PathBuf;

use chrono::NaiveDate;
use rankboard_common::Value;
use rankboard_io::{DataSource, ExcelSource};
use tempfile::TempDir;

fn build_workbook(f: impl FnOnce(&mut umya_spreadsheet::Spreadsheet)) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.xlsx");
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    (dir, path)
}

fn posts_sheet(sh: &mut umya_spreadsheet::Worksheet) {
    sh.get_cell_mut("A1").set_value("site");
    sh.get_cell_mut("B1").set_value("pageviews");
    sh.get_cell_mut("C1").set_value("data");
    sh.get_cell_mut("A2").set_value("UOL");
    sh.get_cell_mut("B2").set_value_number(1200);
    sh.get_cell_mut("A3").set_value("R7");
    sh.get_cell_mut("B3").set_value_number(350.5);
    // 2023-03-01 in the 1900 date system.
    sh.get_cell_mut("C2").set_value_number(44986);
    let _ = sh
        .get_style_mut("C2")
        .get_number_format_mut()
        .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_XLSX14);
}

#[test]
fn first_sheet_with_header_row() {
    let (_dir, path) = build_workbook(|book| {
        posts_sheet(book.get_sheet_by_name_mut("Sheet1").unwrap());
    });

    let ds = ExcelSource::open_path(&path).load().unwrap();
    assert_eq!(ds.columns(), ["site", "pageviews", "data"]);
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.get(0, "site"), Some(&Value::Text("UOL".into())));
    assert_eq!(ds.get(1, "pageviews").and_then(Value::as_number), Some(350.5));
    assert_eq!(
        ds.get(0, "data"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()))
    );
    assert_eq!(ds.get(1, "data"), Some(&Value::Empty));
}

#[test]
fn named_sheet_and_bytes_input() {
    let (_dir, path) = build_workbook(|book| {
        let _ = book.new_sheet("Posts");
        posts_sheet(book.get_sheet_by_name_mut("Posts").unwrap());
    });
    let bytes = std::fs::read(&path).unwrap();

    let src = ExcelSource::from_bytes("upload", bytes).with_sheet("Posts");
    assert_eq!(src.id(), "excel:upload#Posts");
    let ds = src.load().unwrap();
    assert_eq!(ds.row_count(), 2);

    let missing = ExcelSource::open_path(&path).with_sheet("Nope").load();
    assert!(missing.is_err());
}

#[test]
fn non_workbook_bytes_fail_to_load() {
    let err = ExcelSource::from_bytes("junk", b"not a workbook".as_slice())
        .load()
        .unwrap_err();
    assert!(matches!(err, rankboard_io::IoError::Backend { .. }));
}
