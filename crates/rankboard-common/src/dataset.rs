use std::collections::HashSet;
use std::sync::Arc;

use crate::{DataError, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One record, aligned with [`Dataset::columns`].
pub type Row = Vec<Value>;

/// An immutable in-memory table with named, unique columns.
///
/// Columns and rows sit behind `Arc`s so that cloning a dataset, or
/// deriving a filtered view that keeps the same header, is cheap.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Arc<[String]>,
    rows: Arc<[Row]>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            columns: Arc::from(Vec::new()),
            rows: Arc::from(Vec::new()),
        }
    }
}

impl Dataset {
    /// Build a dataset from a header and positional rows.
    ///
    /// Short rows are padded with [`Value::Empty`]; rows wider than the
    /// header and duplicate column names are rejected.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, DataError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(DataError::invalid_spec("duplicate column name").with_column(c));
            }
        }
        let width = columns.len();
        let mut rows = rows;
        for (i, row) in rows.iter_mut().enumerate() {
            if row.len() > width {
                return Err(DataError::invalid_spec(format!(
                    "record {} has {} values but the header has {width} columns",
                    i + 1,
                    row.len()
                )));
            }
            row.resize(width, Value::Empty);
        }
        Ok(Self {
            columns: Arc::from(columns),
            rows: Arc::from(rows),
        })
    }

    /// Build a dataset from name/value records. Column order follows first
    /// appearance; keys missing from a record become [`Value::Empty`].
    pub fn from_records<I, R, K>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<Row> = Vec::new();
        for record in records {
            let mut row = vec![Value::Empty; columns.len()];
            for (k, v) in record {
                let k = k.into();
                let idx = match columns.iter().position(|c| *c == k) {
                    Some(i) => i,
                    None => {
                        columns.push(k);
                        row.push(Value::Empty);
                        columns.len() - 1
                    }
                };
                row[idx] = v;
            }
            rows.push(row);
        }
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Value::Empty);
        }
        Self {
            columns: Arc::from(columns),
            rows: Arc::from(rows),
        }
    }

    /// A dataset with the same header and a different set of rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == self.columns.len()));
        Self {
            columns: Arc::clone(&self.columns),
            rows: Arc::from(rows),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::unknown_column(name))
    }

    /// Values of one column, in record order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |r| &r[idx])
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Zero columns, or no record with at least one non-missing value.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
            || self
                .rows
                .iter()
                .all(|r| r.iter().all(Value::is_missing))
    }

    /// True when both datasets share the same underlying storage.
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.columns, &other.columns) && Arc::ptr_eq(&self.rows, &other.rows)
    }
}
