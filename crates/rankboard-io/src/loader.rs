//! Grid → [`Dataset`] assembly shared by the tabular backends.

use rankboard_common::{Dataset, Row, Value};
use rustc_hash::FxHashSet;

use crate::error::IoError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoaderStats {
    pub rows_loaded: usize,
    pub columns: usize,
    /// Rows shorter than the header, padded with empty cells.
    pub padded_rows: usize,
    /// Fully blank rows that were dropped.
    pub skipped_rows: usize,
}

/// Turn a header row plus body rows into a dataset.
///
/// Blank header cells are named `column_<n>` (1-based) and repeated names
/// get `_2`, `_3`, ... suffixes. Fully blank rows are dropped; rows
/// wider than the header are an error.
pub fn build_dataset(
    header: Vec<String>,
    body: impl IntoIterator<Item = Row>,
) -> Result<(Dataset, LoaderStats), IoError> {
    let columns = unique_headers(header);
    let width = columns.len();
    let mut stats = LoaderStats {
        columns: width,
        ..Default::default()
    };

    let mut rows: Vec<Row> = Vec::new();
    for (i, mut row) in body.into_iter().enumerate() {
        if row.iter().all(Value::is_missing) {
            stats.skipped_rows += 1;
            continue;
        }
        if row.len() > width {
            // Extra trailing blanks are tolerated (common in spreadsheet exports).
            if row[width..].iter().any(|v| !v.is_missing()) {
                return Err(IoError::Header(format!(
                    "record {} has {} fields but the header has {width}",
                    i + 1,
                    row.len()
                )));
            }
            row.truncate(width);
        } else if row.len() < width {
            stats.padded_rows += 1;
        }
        rows.push(row);
    }
    stats.rows_loaded = rows.len();

    let dataset = Dataset::new(columns, rows).map_err(|e| IoError::Header(e.to_string()))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = stats.rows_loaded,
        columns = stats.columns,
        padded = stats.padded_rows,
        skipped = stats.skipped_rows,
        "dataset_built"
    );

    Ok((dataset, stats))
}

/// Blank names become `column_<n>`, repeats get a numeric suffix.
pub fn unique_headers(header: Vec<String>) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::with_capacity(header.len());
    for (i, raw) in header.into_iter().enumerate() {
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", i + 1)
        } else {
            trimmed.to_string()
        };
        let mut name = base.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}
