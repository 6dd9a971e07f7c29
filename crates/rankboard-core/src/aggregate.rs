//! Summary statistics and grouped totals over a (filtered) dataset.

use std::cmp::Ordering;
use std::fmt;

use rankboard_common::{DataError, Dataset, Row, Value, ValueKey};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::format::NumberFormat;
use crate::ranking::{RankingRow, rank};
use crate::sum::CompensatedSum;

pub const DEFAULT_TOP_N: usize = 10;

/// Label used for records whose group value is missing.
pub const BLANK_LABEL: &str = "(blank)";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub value_column: String,
    pub group_column: String,
    #[serde(default)]
    pub subgroup_column: Option<String>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl AggregationSpec {
    pub fn new(value_column: impl Into<String>, group_column: impl Into<String>) -> Self {
        Self {
            value_column: value_column.into(),
            group_column: group_column.into(),
            subgroup_column: None,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_subgroup(mut self, column: impl Into<String>) -> Self {
        self.subgroup_column = Some(column.into());
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: f64,
    /// `None` when no record carries a numeric value.
    pub mean: Option<f64>,
    pub max: Option<f64>,
    /// Records considered, including those with a missing value.
    pub count: usize,
    /// Records that contributed a numeric value.
    pub value_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    pub group: Value,
    pub subgroup: Option<Value>,
}

impl GroupKey {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

fn write_part(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    if v.is_missing() {
        f.write_str(BLANK_LABEL)
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_part(f, &self.group)?;
        if let Some(ref sub) = self.subgroup {
            f.write_str(" / ")?;
            write_part(f, sub)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: GroupKey,
    pub total: f64,
    /// Records in the group, including those with a missing value.
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub summary: Summary,
    /// Sorted by total descending, truncated to `top_n`.
    pub groups: Vec<GroupTotal>,
    /// Number of groups before truncation.
    pub group_count: usize,
}

impl Aggregation {
    /// Ranking rows with the default thousands-grouped integer format.
    pub fn ranking_rows(&self) -> Vec<RankingRow> {
        self.ranking(&NumberFormat::default())
    }

    pub fn ranking(&self, format: &NumberFormat) -> Vec<RankingRow> {
        rank(&self.groups, format)
    }
}

/// One bar series of a grouped chart: the totals of a single subgroup
/// value across the charted groups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub group: Value,
    pub label: String,
    pub total: f64,
}

struct Resolved {
    value: usize,
    group: usize,
    subgroup: Option<usize>,
}

fn resolve(dataset: &Dataset, spec: &AggregationSpec) -> Result<Resolved, DataError> {
    if spec.top_n == 0 {
        return Err(DataError::invalid_spec("top_n must be positive"));
    }
    if dataset.column_count() == 0 {
        return Err(DataError::empty_dataset());
    }
    let value = numeric_column(dataset, &spec.value_column)?;
    let group = dataset.require_column(&spec.group_column)?;
    let subgroup = spec
        .subgroup_column
        .as_deref()
        .map(|c| dataset.require_column(c))
        .transpose()?;
    Ok(Resolved {
        value,
        group,
        subgroup,
    })
}

/// Resolve `column` and check that every non-missing value is numeric.
fn numeric_column(dataset: &Dataset, column: &str) -> Result<usize, DataError> {
    let idx = dataset.require_column(column)?;
    if let Some(bad) = dataset
        .column_values(idx)
        .find(|v| !v.is_missing() && v.as_number().is_none())
    {
        return Err(DataError::invalid_spec(format!(
            "value column is not numeric ({} value '{bad}')",
            bad.type_name()
        ))
        .with_column(column));
    }
    Ok(idx)
}

/// Summary metrics, grouped totals and the top-N cut for one spec.
///
/// Fails with `EmptyDataset` when no record survives, so callers never see
/// a mean of zero records.
pub fn aggregate(dataset: &Dataset, spec: &AggregationSpec) -> Result<Aggregation, DataError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!(
        "aggregate",
        value = spec.value_column.as_str(),
        group = spec.group_column.as_str(),
        rows = dataset.row_count()
    )
    .entered();

    let cols = resolve(dataset, spec)?;
    if dataset.is_empty() {
        return Err(DataError::empty_dataset());
    }
    let summary = summary_of(dataset.rows(), cols.value);
    let mut groups = totals_by_key(dataset.rows(), &cols);
    let group_count = groups.len();
    groups.truncate(spec.top_n);

    #[cfg(feature = "tracing")]
    tracing::debug!(groups = group_count, kept = groups.len(), "aggregated");

    Ok(Aggregation {
        summary,
        groups,
        group_count,
    })
}

/// Summary metrics of a single numeric column.
pub fn summarize(dataset: &Dataset, value_column: &str) -> Result<Summary, DataError> {
    if dataset.column_count() == 0 {
        return Err(DataError::empty_dataset());
    }
    let idx = numeric_column(dataset, value_column)?;
    if dataset.is_empty() {
        return Err(DataError::empty_dataset());
    }
    Ok(summary_of(dataset.rows(), idx))
}

/// All group totals, sorted descending, without the top-N cut.
pub fn group_totals(dataset: &Dataset, spec: &AggregationSpec) -> Result<Vec<GroupTotal>, DataError> {
    let cols = resolve(dataset, spec)?;
    Ok(totals_by_key(dataset.rows(), &cols))
}

fn summary_of(rows: &[Row], value: usize) -> Summary {
    let mut sum = CompensatedSum::default();
    let mut max: Option<f64> = None;
    let mut value_count = 0usize;
    for n in rows.iter().filter_map(|r| r[value].as_number()) {
        sum.add(n);
        value_count += 1;
        max = Some(max.map_or(n, |m| m.max(n)));
    }
    let total = sum.value();
    Summary {
        total,
        mean: (value_count > 0).then(|| total / value_count as f64),
        max,
        count: rows.len(),
        value_count,
    }
}

type CompositeKey = SmallVec<[ValueKey; 2]>;

struct Acc {
    key: GroupKey,
    sum: CompensatedSum,
    count: usize,
}

fn representative(v: &Value) -> Value {
    if v.is_missing() { Value::Empty } else { v.clone() }
}

fn totals_by_key(rows: &[Row], cols: &Resolved) -> Vec<GroupTotal> {
    let mut index: FxHashMap<CompositeKey, usize> = FxHashMap::default();
    let mut accs: Vec<Acc> = Vec::new();
    for row in rows {
        let g = &row[cols.group];
        let sub = cols.subgroup.map(|i| &row[i]);
        let mut key: CompositeKey = SmallVec::new();
        key.push(g.key());
        if let Some(s) = sub {
            key.push(s.key());
        }
        let slot = *index.entry(key).or_insert_with(|| {
            accs.push(Acc {
                key: GroupKey {
                    group: representative(g),
                    subgroup: sub.map(representative),
                },
                sum: CompensatedSum::default(),
                count: 0,
            });
            accs.len() - 1
        });
        let acc = &mut accs[slot];
        acc.count += 1;
        if let Some(n) = row[cols.value].as_number() {
            acc.sum.add(n);
        }
    }
    let mut out: Vec<GroupTotal> = accs
        .into_iter()
        .map(|a| GroupTotal {
            key: a.key,
            total: a.sum.value(),
            count: a.count,
        })
        .collect();
    // Stable: equal totals keep first-appearance order.
    out.sort_by(|a, b| descending(a.total, b.total));
    out
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Number of distinct non-missing values in `column`.
pub fn distinct_count(dataset: &Dataset, column: &str) -> Result<usize, DataError> {
    let idx = dataset.require_column(column)?;
    let keys: FxHashSet<ValueKey> = dataset
        .column_values(idx)
        .filter(|v| !v.is_missing())
        .map(Value::key)
        .collect();
    Ok(keys.len())
}

/// Chart series for a grouped bar chart.
///
/// The x axis holds the `top_n` groups of `group_column` ranked by their
/// overall total. Without a subgroup column there is a single series named
/// after the value column; otherwise there is one series per subgroup value
/// in first-appearance order, each carrying only the groups it occurs in.
pub fn grouped_series(dataset: &Dataset, spec: &AggregationSpec) -> Result<Vec<Series>, DataError> {
    let cols = resolve(dataset, spec)?;
    if dataset.is_empty() {
        return Err(DataError::empty_dataset());
    }
    let primary = Resolved {
        value: cols.value,
        group: cols.group,
        subgroup: None,
    };
    let mut axis = totals_by_key(dataset.rows(), &primary);
    axis.truncate(spec.top_n);

    let Some(sub_idx) = cols.subgroup else {
        return Ok(vec![Series {
            name: spec.value_column.clone(),
            points: axis
                .into_iter()
                .map(|g| SeriesPoint {
                    label: g.key.label(),
                    group: g.key.group,
                    total: g.total,
                })
                .collect(),
        }]);
    };

    let combos = totals_by_key(dataset.rows(), &cols);
    let mut lookup: FxHashMap<(ValueKey, ValueKey), f64> = FxHashMap::default();
    for c in &combos {
        let sub = c.key.subgroup.as_ref().map_or(ValueKey::Missing, Value::key);
        lookup.insert((c.key.group.key(), sub), c.total);
    }

    let mut seen: FxHashSet<ValueKey> = FxHashSet::default();
    let mut series = Vec::new();
    for row in dataset.rows() {
        let s = &row[sub_idx];
        let skey = s.key();
        if !seen.insert(skey.clone()) {
            continue;
        }
        let points: Vec<SeriesPoint> = axis
            .iter()
            .filter_map(|g| {
                lookup
                    .get(&(g.key.group.key(), skey.clone()))
                    .map(|total| SeriesPoint {
                        group: g.key.group.clone(),
                        label: g.key.label(),
                        total: *total,
                    })
            })
            .collect();
        if !points.is_empty() {
            let name = GroupKey {
                group: representative(s),
                subgroup: None,
            }
            .label();
            series.push(Series { name, points });
        }
    }
    Ok(series)
}

/// The `n` records with the largest value in `value_column`, as a dataset.
/// Ties keep record order; records without a numeric value sort last.
pub fn top_records(dataset: &Dataset, value_column: &str, n: usize) -> Result<Dataset, DataError> {
    let idx = dataset.require_column(value_column)?;
    let mut order: Vec<(usize, Option<f64>)> = dataset
        .rows()
        .iter()
        .enumerate()
        .map(|(i, r)| (i, r[idx].as_number()))
        .collect();
    order.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => descending(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    let rows = order
        .into_iter()
        .take(n)
        .map(|(i, _)| dataset.rows()[i].clone())
        .collect();
    Ok(dataset.with_rows(rows))
}
