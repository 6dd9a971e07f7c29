//! Categorical and date-window filtering.
//!
//! An empty allowed-value set for a column means "no restriction", the
//! same as leaving the column out of the selection. Callers that really
//! want to exclude every record use [`ColumnFilter::ExcludeAll`].

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rankboard_common::{DataError, Dataset, Row, Value, ValueKey};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::classify::{ColumnClassification, ColumnKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFilter {
    /// Keep records whose value is one of these. Empty keeps everything.
    AnyOf(Vec<Value>),
    /// Keep nothing.
    ExcludeAll,
}

impl ColumnFilter {
    fn is_restriction(&self) -> bool {
        match self {
            ColumnFilter::AnyOf(values) => !values.is_empty(),
            ColumnFilter::ExcludeAll => true,
        }
    }
}

/// Keeps records whose date in `column` falls within the `last_days` days
/// ending at `reference` (both ends inclusive).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub column: String,
    pub last_days: u32,
    pub reference: NaiveDate,
}

impl DateWindow {
    pub fn new(column: impl Into<String>, last_days: u32, reference: NaiveDate) -> Self {
        Self {
            column: column.into(),
            last_days,
            reference,
        }
    }

    pub fn last_7_days(column: impl Into<String>, reference: NaiveDate) -> Self {
        Self::new(column, 7, reference)
    }

    pub fn last_30_days(column: impl Into<String>, reference: NaiveDate) -> Self {
        Self::new(column, 30, reference)
    }

    pub fn last_90_days(column: impl Into<String>, reference: NaiveDate) -> Self {
        Self::new(column, 90, reference)
    }

    pub fn last_year(column: impl Into<String>, reference: NaiveDate) -> Self {
        Self::new(column, 365, reference)
    }

    pub fn start(&self) -> NaiveDate {
        self.reference - Duration::days(self.last_days as i64)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.reference
    }
}

/// Per-interaction filter state: allowed values per column plus an
/// optional date window. All parts combine with logical AND.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    columns: BTreeMap<String, ColumnFilter>,
    window: Option<DateWindow>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `column` to `values`; an empty list lifts the restriction.
    pub fn allow<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.set(column, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_all(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into(), ColumnFilter::ExcludeAll);
        self
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, values: Vec<Value>) {
        self.columns.insert(column.into(), ColumnFilter::AnyOf(values));
    }

    pub fn set_window(&mut self, window: Option<DateWindow>) {
        self.window = window;
    }

    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.columns.get(column)
    }

    pub fn window(&self) -> Option<&DateWindow> {
        self.window.as_ref()
    }

    /// Columns that actually restrict the result.
    pub fn active_columns(&self) -> impl Iterator<Item = (&str, &ColumnFilter)> + '_ {
        self.columns
            .iter()
            .filter(|(_, f)| f.is_restriction())
            .map(|(c, f)| (c.as_str(), f))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.window.is_none() && self.active_columns().next().is_none()
    }
}

enum Check<'a> {
    Member(usize, FxHashSet<ValueKey>),
    Nothing,
    Window(usize, &'a DateWindow),
}

impl Check<'_> {
    fn passes(&self, row: &Row) -> bool {
        match self {
            Check::Member(idx, keys) => keys.contains(&row[*idx].key()),
            Check::Nothing => false,
            Check::Window(idx, w) => row[*idx].as_date().is_some_and(|d| w.contains(d)),
        }
    }
}

/// Return the records of `dataset` that pass every active filter.
///
/// An unrestricted selection returns a clone sharing the input's storage.
/// Filtering down to zero records is not an error; naming a column the
/// dataset does not have is.
pub fn apply_filters(dataset: &Dataset, selection: &FilterSelection) -> Result<Dataset, DataError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("apply_filters", rows = dataset.row_count()).entered();

    if selection.is_unrestricted() {
        return Ok(dataset.clone());
    }

    let mut checks: Vec<Check<'_>> = Vec::new();
    for (column, filter) in selection.active_columns() {
        let idx = dataset.require_column(column)?;
        checks.push(match filter {
            ColumnFilter::AnyOf(values) => Check::Member(idx, values.iter().map(Value::key).collect()),
            ColumnFilter::ExcludeAll => Check::Nothing,
        });
    }
    if let Some(w) = selection.window() {
        let idx = dataset.require_column(&w.column)?;
        checks.push(Check::Window(idx, w));
    }

    let rows: Vec<Row> = dataset
        .rows()
        .iter()
        .filter(|row| checks.iter().all(|c| c.passes(row)))
        .cloned()
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(kept = rows.len(), filters = checks.len(), "filters_applied");

    Ok(dataset.with_rows(rows))
}

/// A filterable column with its distinct values in first-appearance order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub column: String,
    pub values: Vec<Value>,
}

/// Offer at most `max_columns` categorical columns as filters, skipping any
/// whose distinct-value count exceeds `max_cardinality`.
pub fn filter_options(
    dataset: &Dataset,
    schema: &ColumnClassification,
    max_columns: usize,
    max_cardinality: usize,
) -> Vec<FilterOption> {
    let mut out = Vec::new();
    for col in schema.columns() {
        if out.len() >= max_columns {
            break;
        }
        if col.kind != ColumnKind::Categorical {
            continue;
        }
        let Some(idx) = dataset.column_index(&col.name) else {
            continue;
        };
        if let Some(values) = distinct_values(dataset, idx, max_cardinality)
            && !values.is_empty()
        {
            out.push(FilterOption {
                column: col.name.clone(),
                values,
            });
        }
    }
    out
}

/// Distinct non-missing values of a column, or `None` once more than
/// `limit` are found.
fn distinct_values(dataset: &Dataset, idx: usize, limit: usize) -> Option<Vec<Value>> {
    let mut seen: FxHashSet<ValueKey> = FxHashSet::default();
    let mut values = Vec::new();
    for v in dataset.column_values(idx) {
        if v.is_missing() {
            continue;
        }
        if seen.insert(v.key()) {
            if values.len() == limit {
                return None;
            }
            values.push(v.clone());
        }
    }
    Some(values)
}
