//! Column classification: partitions a dataset's columns into numeric,
//! date-like and categorical-text groups.
//!
//! Classification is best-effort. A column is numeric when every
//! non-missing value reads as a number, date-like when it is not numeric and
//! its first few non-missing values all read as dates, and categorical
//! otherwise. Columns without any non-missing value are categorical.

use rankboard_common::{Dataset, Value};
use serde::{Deserialize, Serialize};

/// Number of leading non-missing values inspected for date detection.
pub const DEFAULT_DATE_SAMPLE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    DateLike,
    Categorical,
}

impl ColumnKind {
    /// Usable as a grouping or filter dimension.
    pub fn is_dimension(self) -> bool {
        matches!(self, ColumnKind::DateLike | ColumnKind::Categorical)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// Typed schema of a dataset, built once per load and consumed downstream
/// instead of re-inspecting raw values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    columns: Vec<ClassifiedColumn>,
}

impl ColumnClassification {
    pub fn columns(&self) -> &[ClassifiedColumn] {
        &self.columns
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    fn of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &str> + '_ {
        self.columns
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| c.name.as_str())
    }

    pub fn numeric(&self) -> impl Iterator<Item = &str> + '_ {
        self.of_kind(ColumnKind::Numeric)
    }

    pub fn date_like(&self) -> impl Iterator<Item = &str> + '_ {
        self.of_kind(ColumnKind::DateLike)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &str> + '_ {
        self.of_kind(ColumnKind::Categorical)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub fn classify_columns(dataset: &Dataset) -> ColumnClassification {
    classify_columns_with(dataset, DEFAULT_DATE_SAMPLE)
}

pub fn classify_columns_with(dataset: &Dataset, date_sample: usize) -> ColumnClassification {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!(
        "classify_columns",
        columns = dataset.column_count(),
        rows = dataset.row_count()
    )
    .entered();

    let columns = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| ClassifiedColumn {
            name: name.clone(),
            kind: classify_values(dataset.column_values(idx), date_sample),
        })
        .collect();
    ColumnClassification { columns }
}

/// Classify a single column from its values in record order.
pub fn classify_values<'a, I>(values: I, date_sample: usize) -> ColumnKind
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut present = 0usize;
    let mut numeric = true;
    let mut dates = true;
    for v in values.into_iter().filter(|v| !v.is_missing()) {
        present += 1;
        if numeric && v.as_number().is_none() {
            numeric = false;
        }
        if dates && present <= date_sample && v.as_datetime().is_none() {
            dates = false;
        }
        if !numeric && (!dates || present >= date_sample) {
            break;
        }
    }
    if present == 0 {
        ColumnKind::Categorical
    } else if numeric {
        ColumnKind::Numeric
    } else if dates {
        ColumnKind::DateLike
    } else {
        ColumnKind::Categorical
    }
}
