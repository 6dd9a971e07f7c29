use std::fs::File;
use std::fmt::Write as _;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rankboard_common::{Dataset, Row, Value};

use crate::error::IoError;
use crate::loader::build_dataset;
use crate::traits::DataSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTrim {
    #[default]
    None,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTypeInference {
    /// Do not infer: treat all non-empty fields as text.
    Off,
    /// Infer booleans + numbers when unambiguous.
    #[default]
    Basic,
    /// Like `Basic`, plus ISO `YYYY-MM-DD[ HH:MM:SS]` dates.
    BasicWithDates,
}

#[derive(Clone, Debug)]
pub struct CsvReadOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV.
    pub delimiter: u8,
    pub trim: CsvTrim,
    pub type_inference: CsvTypeInference,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: CsvTrim::None,
            type_inference: CsvTypeInference::Basic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvNewline {
    #[default]
    Lf,
    Crlf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvQuoteStyle {
    #[default]
    Necessary,
    Always,
    Never,
    NonNumeric,
}

#[derive(Clone, Debug)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
    pub newline: CsvNewline,
    pub quote_style: CsvQuoteStyle,
    /// chrono pattern for `Value::Date` cells.
    pub date_format: String,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            newline: CsvNewline::Lf,
            quote_style: CsvQuoteStyle::Necessary,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
enum CsvInput {
    Path(PathBuf),
    Bytes { name: String, data: Arc<[u8]> },
}

/// A CSV file (or in-memory CSV bytes) whose first record is the header.
#[derive(Clone, Debug)]
pub struct CsvSource {
    input: CsvInput,
    options: CsvReadOptions,
}

impl CsvSource {
    pub fn open_path<P: AsRef<Path>>(path: P) -> Self {
        Self::open_path_with_options(path, CsvReadOptions::default())
    }

    pub fn open_path_with_options<P: AsRef<Path>>(path: P, options: CsvReadOptions) -> Self {
        Self {
            input: CsvInput::Path(path.as_ref().to_path_buf()),
            options,
        }
    }

    /// In-memory CSV; `name` keeps cache ids distinct between buffers.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::from_bytes_with_options(name, data, CsvReadOptions::default())
    }

    pub fn from_bytes_with_options(
        name: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
        options: CsvReadOptions,
    ) -> Self {
        Self {
            input: CsvInput::Bytes {
                name: name.into(),
                data: data.into(),
            },
            options,
        }
    }

    pub fn options(&self) -> &CsvReadOptions {
        &self.options
    }
}

impl DataSource for CsvSource {
    fn id(&self) -> String {
        match &self.input {
            CsvInput::Path(p) => format!("csv:{}", p.display()),
            CsvInput::Bytes { name, .. } => format!("csv:{name}"),
        }
    }

    fn load(&self) -> Result<Dataset, IoError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("source_load", source = self.id().as_str()).entered();

        match &self.input {
            CsvInput::Path(p) => {
                let file = File::open(p)?;
                read_csv(BufReader::new(file), &self.options)
            }
            CsvInput::Bytes { data, .. } => read_csv(&data[..], &self.options),
        }
    }
}

/// Parse CSV with a header row into a dataset.
pub fn read_csv<R: Read>(reader: R, options: &CsvReadOptions) -> Result<Dataset, IoError> {
    let mut rb = csv::ReaderBuilder::new();
    rb.delimiter(options.delimiter)
        .has_headers(true)
        // Allow ragged rows; short ones are padded by the loader.
        .flexible(true);
    match options.trim {
        CsvTrim::None => rb.trim(csv::Trim::None),
        CsvTrim::All => rb.trim(csv::Trim::All),
    };
    let mut rdr = rb.from_reader(reader);

    let header: Vec<String> = rdr
        .headers()
        .map_err(|e| IoError::from_backend("csv", e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    if header.is_empty() {
        return Err(IoError::Header("csv: no header row".to_string()));
    }

    let mut body: Vec<Row> = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| IoError::from_backend("csv", e))?;
        body.push(
            rec.iter()
                .map(|f| infer_field(f, options.type_inference))
                .collect(),
        );
    }

    let (dataset, _stats) = build_dataset(header, body)?;
    Ok(dataset)
}

fn infer_field(field: &str, mode: CsvTypeInference) -> Value {
    if field.is_empty() {
        return Value::Empty;
    }
    if mode == CsvTypeInference::Off {
        return Value::Text(field.to_string());
    }
    if let Some(b) = parse_bool(field) {
        return Value::Boolean(b);
    }
    if let Some(i) = parse_unambiguous_i64(field) {
        return Value::Int(i);
    }
    if let Some(n) = parse_unambiguous_f64(field) {
        return Value::Number(n);
    }
    if mode == CsvTypeInference::BasicWithDates {
        if let Some(d) = parse_date(field) {
            return Value::Date(d);
        }
        if let Some(dt) = parse_datetime(field) {
            return Value::DateTime(dt);
        }
    }
    Value::Text(field.to_string())
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_unambiguous_i64(s: &str) -> Option<i64> {
    // Leading zeros (ids, zip codes) stay text, except "0" itself.
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

fn parse_unambiguous_f64(s: &str) -> Option<f64> {
    if !(s.contains('.') || s.contains('e') || s.contains('E')) {
        return None;
    }
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned.len() > 1 && unsigned.starts_with('0') && !unsigned.starts_with("0.") {
        return None;
    }
    let n: f64 = s.parse().ok()?;
    n.is_finite().then_some(n)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn csv_quote_style(q: CsvQuoteStyle) -> csv::QuoteStyle {
    match q {
        CsvQuoteStyle::Necessary => csv::QuoteStyle::Necessary,
        CsvQuoteStyle::Always => csv::QuoteStyle::Always,
        CsvQuoteStyle::Never => csv::QuoteStyle::Never,
        CsvQuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
    }
}

fn csv_terminator(nl: CsvNewline) -> csv::Terminator {
    match nl {
        CsvNewline::Lf => csv::Terminator::Any(b'\n'),
        CsvNewline::Crlf => csv::Terminator::CRLF,
    }
}

fn value_to_csv_field(v: &Value, opts: &CsvWriteOptions) -> Result<String, IoError> {
    let field = match v {
        Value::Empty => String::new(),
        Value::Text(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Number(n) if n.is_nan() => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Boolean(true) => "TRUE".to_string(),
        Value::Boolean(false) => "FALSE".to_string(),
        Value::Date(d) => {
            let mut out = String::new();
            write!(out, "{}", d.format(&opts.date_format)).map_err(|_| {
                IoError::from_backend(
                    "csv",
                    format!("date_format '{}' cannot render a date", opts.date_format),
                )
            })?;
            out
        }
        Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    Ok(field)
}

/// Write the header row, then every record of `dataset`.
pub fn write_dataset_csv<W: Write>(
    dataset: &Dataset,
    writer: W,
    opts: &CsvWriteOptions,
) -> Result<(), IoError> {
    let mut wb = csv::WriterBuilder::new();
    wb.delimiter(opts.delimiter)
        .terminator(csv_terminator(opts.newline))
        .quote_style(csv_quote_style(opts.quote_style));
    let mut wtr = wb.from_writer(writer);

    wtr.write_record(dataset.columns())
        .map_err(|e| IoError::from_backend("csv", e))?;
    for row in dataset.rows() {
        let fields = row
            .iter()
            .map(|v| value_to_csv_field(v, opts))
            .collect::<Result<Vec<_>, _>>()?;
        wtr.write_record(&fields)
            .map_err(|e| IoError::from_backend("csv", e))?;
    }
    wtr.flush()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = dataset.row_count(), "csv_written");

    Ok(())
}

pub fn write_dataset_csv_to_path<P: AsRef<Path>>(
    dataset: &Dataset,
    path: P,
    opts: &CsvWriteOptions,
) -> Result<(), IoError> {
    let file = File::create(path)?;
    write_dataset_csv(dataset, std::io::BufWriter::new(file), opts)
}
