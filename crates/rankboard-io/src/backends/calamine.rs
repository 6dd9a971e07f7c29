use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use rankboard_common::{Dataset, Row, Value, serial_to_datetime};

use crate::error::IoError;
use crate::loader::build_dataset;
use crate::traits::DataSource;

#[derive(Clone, Debug)]
enum WorkbookInput {
    Path(PathBuf),
    Bytes { name: String, data: Arc<[u8]> },
}

/// One worksheet of an `.xlsx`/`.xls`/`.ods` workbook. The first non-empty
/// row of the used range is the header.
#[derive(Clone, Debug)]
pub struct ExcelSource {
    input: WorkbookInput,
    sheet: Option<String>,
}

impl ExcelSource {
    pub fn open_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            input: WorkbookInput::Path(path.as_ref().to_path_buf()),
            sheet: None,
        }
    }

    pub fn from_bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            input: WorkbookInput::Bytes {
                name: name.into(),
                data: data.into(),
            },
            sheet: None,
        }
    }

    /// Read `sheet` instead of the first worksheet.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    fn read_range<RS>(&self, mut workbook: Sheets<RS>) -> Result<Range<Data>, IoError>
    where
        RS: std::io::Read + std::io::Seek,
    {
        let name = match &self.sheet {
            Some(s) => s.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| IoError::Backend {
                    backend: "calamine".to_string(),
                    message: "workbook has no worksheets".to_string(),
                })?,
        };
        workbook
            .worksheet_range(&name)
            .map_err(|e| IoError::from_backend("calamine", e))
    }
}

impl DataSource for ExcelSource {
    fn id(&self) -> String {
        let base = match &self.input {
            WorkbookInput::Path(p) => format!("excel:{}", p.display()),
            WorkbookInput::Bytes { name, .. } => format!("excel:{name}"),
        };
        match &self.sheet {
            Some(s) => format!("{base}#{s}"),
            None => base,
        }
    }

    fn load(&self) -> Result<Dataset, IoError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("source_load", source = self.id().as_str()).entered();

        let range = match &self.input {
            WorkbookInput::Path(p) => {
                let wb = open_workbook_auto(p).map_err(|e| IoError::from_backend("calamine", e))?;
                self.read_range(wb)?
            }
            WorkbookInput::Bytes { data, .. } => {
                let wb = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
                    .map_err(|e| IoError::from_backend("calamine", e))?;
                self.read_range(wb)?
            }
        };
        range_to_dataset(&range)
    }
}

fn range_to_dataset(range: &Range<Data>) -> Result<Dataset, IoError> {
    let mut rows = range
        .rows()
        .skip_while(|r| r.iter().all(|c| convert_value(c).is_missing()));
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::default());
    };
    let mut header: Vec<String> = header_row.iter().map(header_text).collect();
    // Drop trailing unnamed columns that hold no data.
    while header.last().is_some_and(|h| h.trim().is_empty()) {
        header.pop();
    }
    let body: Vec<Row> = rows
        .map(|r| r.iter().map(convert_value).collect())
        .collect();
    let (dataset, _stats) = build_dataset(header, body)?;
    Ok(dataset)
}

fn header_text(data: &Data) -> String {
    match convert_value(data) {
        Value::Empty => String::new(),
        v => v.to_string(),
    }
}

fn convert_value(data: &Data) -> Value {
    match data {
        Data::Empty => Value::Empty,
        Data::String(s) if s.is_empty() => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Int(*i),
        Data::Bool(b) => Value::Boolean(*b),
        // Formula errors carry no usable value.
        Data::Error(_) => Value::Empty,
        Data::DateTime(dt) => date_cell(dt.as_f64()),
        Data::DateTimeIso(s) => Value::Text(s.clone()),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

/// Date-formatted cell. Whole serials are dates; serials past the calendar
/// range keep their number.
fn date_cell(serial: f64) -> Value {
    match serial_to_datetime(serial) {
        Some(dt) if serial.fract() == 0.0 => Value::Date(dt.date()),
        Some(dt) => Value::DateTime(dt),
        None => Value::Number(serial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_errors() {
        assert_eq!(convert_value(&Data::String(String::new())), Value::Empty);
        assert_eq!(convert_value(&Data::Int(3)), Value::Int(3));
        assert_eq!(
            convert_value(&Data::Error(calamine::CellErrorType::Div0)),
            Value::Empty
        );
    }

    #[test]
    fn date_cells_by_serial() {
        assert_eq!(
            date_cell(44986.0),
            Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 3, 1).unwrap())
        );
        assert!(matches!(date_cell(44986.5), Value::DateTime(_)));
        assert_eq!(date_cell(1.0e9), Value::Number(1.0e9));
    }
}
