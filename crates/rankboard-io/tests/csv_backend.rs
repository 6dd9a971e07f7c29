use std::io::Write;

use chrono::NaiveDate;
use rankboard_common::Value;
use rankboard_io::{
    CsvNewline, CsvReadOptions, CsvSource, CsvTrim, CsvTypeInference, CsvWriteOptions, DataSource,
    IoError, write_dataset_csv, write_dataset_csv_to_path,
};

fn load_bytes(bytes: &[u8], opts: CsvReadOptions) -> rankboard_common::Dataset {
    CsvSource::from_bytes_with_options("test", bytes, opts)
        .load()
        .unwrap()
}

#[test]
fn header_row_and_basic_inference() {
    let ds = load_bytes(
        b"cat,val,flag\nA,10,true\nB,2.5,FALSE\nA,,\n",
        CsvReadOptions::default(),
    );
    assert_eq!(ds.columns(), ["cat", "val", "flag"]);
    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.get(0, "val"), Some(&Value::Int(10)));
    assert_eq!(ds.get(1, "val"), Some(&Value::Number(2.5)));
    assert_eq!(ds.get(1, "flag"), Some(&Value::Boolean(false)));
    assert_eq!(ds.get(2, "val"), Some(&Value::Empty));
}

#[test]
fn tsv_with_trim_and_dates() {
    let opts = CsvReadOptions {
        delimiter: b'\t',
        trim: CsvTrim::All,
        type_inference: CsvTypeInference::BasicWithDates,
    };
    let ds = load_bytes(b"site\tdata\n UOL \t2025-05-03\n", opts);
    assert_eq!(ds.get(0, "site"), Some(&Value::Text("UOL".into())));
    assert_eq!(
        ds.get(0, "data"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap()))
    );
}

#[test]
fn ragged_rows_are_padded() {
    let ds = load_bytes(b"a,b,c\n1\n1,2,3\n", CsvReadOptions::default());
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.get(0, "c"), Some(&Value::Empty));
}

#[test]
fn wide_rows_are_rejected() {
    let err = CsvSource::from_bytes("wide", b"a,b\n1,2,3\n".as_slice())
        .load()
        .unwrap_err();
    assert!(matches!(err, IoError::Header(_)));
}

#[test]
fn blank_and_duplicate_headers() {
    let ds = load_bytes(b"\xef\xbb\xbfname,,name\nx,y,z\n", CsvReadOptions::default());
    assert_eq!(ds.columns(), ["name", "column_2", "name_2"]);
}

#[test]
fn empty_input_is_a_header_error() {
    let err = CsvSource::from_bytes("empty", Vec::<u8>::new()).load().unwrap_err();
    assert!(matches!(err, IoError::Header(_)));
}

#[test]
fn invalid_utf8_is_a_backend_error() {
    let err = CsvSource::from_bytes("bin", b"a,b\n\xff\xfe,1\n".as_slice())
        .load()
        .unwrap_err();
    assert!(matches!(err, IoError::Backend { .. }));
}

#[test]
fn open_path_reads_files() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    writeln!(tmp, "site,pageviews").unwrap();
    writeln!(tmp, "R7,1200").unwrap();
    tmp.flush().unwrap();

    let src = CsvSource::open_path(tmp.path());
    assert!(src.id().starts_with("csv:"));
    let ds = src.load().unwrap();
    assert_eq!(ds.get(0, "pageviews"), Some(&Value::Int(1200)));

    let missing = CsvSource::open_path(tmp.path().with_extension("nope"));
    assert!(matches!(missing.load(), Err(IoError::Io(_))));
}

#[test]
fn export_writes_header_and_records() {
    let ds = load_bytes(
        b"site,note,views\nUOL,\"a, b\",10\nR7,,2.5\n",
        CsvReadOptions::default(),
    );
    let mut out = Vec::new();
    write_dataset_csv(&ds, &mut out, &CsvWriteOptions::default()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "site,note,views\nUOL,\"a, b\",10\nR7,,2.5\n"
    );
}

#[test]
fn export_formats_dates_and_newlines() {
    let ds = rankboard_common::Dataset::from_records([[
        ("d", Value::Date(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap())),
        ("ok", Value::Boolean(true)),
    ]]);
    let opts = CsvWriteOptions {
        newline: CsvNewline::Crlf,
        date_format: "%d/%m/%Y".into(),
        ..Default::default()
    };
    let mut out = Vec::new();
    write_dataset_csv(&ds, &mut out, &opts).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "d,ok\r\n09/01/2025,TRUE\r\n");
}

#[test]
fn export_rejects_unrenderable_date_format() {
    let ds = rankboard_common::Dataset::from_records([[(
        "d",
        Value::Date(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()),
    )]]);
    for date_format in ["%Q", "%H:%M"] {
        let opts = CsvWriteOptions {
            date_format: date_format.into(),
            ..Default::default()
        };
        let mut out = Vec::new();
        let err = write_dataset_csv(&ds, &mut out, &opts).unwrap_err();
        assert!(matches!(err, IoError::Backend { .. }), "{date_format}: {err}");
    }
}

#[test]
fn export_then_reload_from_disk() {
    let ds = load_bytes(b"k,v\na,1\nb,2\n", CsvReadOptions::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    write_dataset_csv_to_path(&ds, &path, &CsvWriteOptions::default()).unwrap();
    let back = CsvSource::open_path(&path).load().unwrap();
    assert_eq!(back, ds);
}
