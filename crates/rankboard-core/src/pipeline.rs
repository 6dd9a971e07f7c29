//! The per-request dashboard pipeline:
//! classify → filter options → filter → summarize → chart → rank → detail.
//!
//! Every call is a pure function of the dataset, the request and the
//! config. Hosts run it once per user interaction; nothing is cached here.

use rankboard_common::{DataError, Dataset, Value};
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    AggregationSpec, Series, Summary, aggregate, distinct_count, grouped_series, top_records,
};
use crate::classify::{ColumnClassification, ColumnKind, classify_columns_with};
use crate::config::DashboardConfig;
use crate::filter::{FilterOption, FilterSelection, apply_filters, filter_options};
use crate::format::{NumberFormat, format_date};
use crate::ranking::RankingRow;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardRequest {
    pub filters: FilterSelection,
    /// Defaults to the first numeric column.
    pub value_column: Option<String>,
    /// Defaults to the first categorical (then date-like) column.
    pub group_column: Option<String>,
    /// Second ranking dimension; ranked labels become `group / subgroup`.
    pub subgroup_column: Option<String>,
    /// X axis of the chart; defaults to the group column.
    pub chart_group_column: Option<String>,
    /// One chart series per value of this column.
    pub series_column: Option<String>,
}

/// Schema and filter choices, available even when a selection matches
/// no records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub schema: ColumnClassification,
    pub filter_options: Vec<FilterOption>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailTable {
    pub columns: Vec<String>,
    pub rows: Vec<DetailRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub position: usize,
    pub cells: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub controls: Controls,
    pub value_column: String,
    pub group_column: String,
    pub source_rows: usize,
    pub filtered_rows: usize,
    pub summary: Summary,
    pub formatted_summary: FormattedSummary,
    pub distinct_groups: usize,
    pub chart: Vec<Series>,
    pub ranking: Vec<RankingRow>,
    pub detail: DetailTable,
    /// Records that passed the filters, for export.
    #[serde(skip)]
    pub filtered: Dataset,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedSummary {
    pub total: String,
    pub mean: String,
    pub max: String,
    pub count: String,
}

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: DashboardConfig,
}

impl Pipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn controls(&self, dataset: &Dataset) -> Controls {
        let schema = classify_columns_with(dataset, self.config.date_sample_size);
        let filter_options = filter_options(
            dataset,
            &schema,
            self.config.max_filter_columns,
            self.config.max_filter_cardinality,
        );
        Controls {
            schema,
            filter_options,
        }
    }

    /// Run the whole pipeline for one request.
    ///
    /// Returns `EmptyDataset` when the dataset is empty or the filters leave
    /// no records; hosts can still call [`Pipeline::controls`] to redraw
    /// their selectors.
    pub fn run(&self, dataset: &Dataset, request: &DashboardRequest) -> Result<DashboardView, DataError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pipeline_run", rows = dataset.row_count()).entered();

        if dataset.is_empty() {
            return Err(DataError::empty_dataset());
        }
        let controls = self.controls(dataset);
        let schema = &controls.schema;

        let value_column = pick(
            request.value_column.as_deref(),
            schema,
            &[ColumnKind::Numeric],
            "value",
        )?;
        let group_column = pick(
            request.group_column.as_deref(),
            schema,
            &[ColumnKind::Categorical, ColumnKind::DateLike],
            "group",
        )?;
        for dim in [
            request.subgroup_column.as_deref(),
            request.chart_group_column.as_deref(),
            request.series_column.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            pick(Some(dim), schema, &[ColumnKind::Categorical, ColumnKind::DateLike], "group")?;
        }

        let filtered = apply_filters(dataset, &request.filters)?;
        if filtered.is_empty() {
            return Err(DataError::empty_dataset());
        }

        let mut ranking_spec = AggregationSpec::new(&value_column, &group_column)
            .with_top_n(self.config.ranking_top_n);
        if let Some(ref sub) = request.subgroup_column {
            ranking_spec = ranking_spec.with_subgroup(sub);
        }
        let aggregation = aggregate(&filtered, &ranking_spec)?;
        let ranking = aggregation.ranking(&self.config.number_format);

        let chart_group = request
            .chart_group_column
            .clone()
            .unwrap_or_else(|| group_column.clone());
        let mut chart_spec =
            AggregationSpec::new(&value_column, chart_group).with_top_n(self.config.chart_top_n);
        if let Some(ref series) = request.series_column {
            chart_spec = chart_spec.with_subgroup(series);
        }
        let chart = grouped_series(&filtered, &chart_spec)?;

        let distinct_groups = distinct_count(&filtered, &group_column)?;
        let detail = self.detail_table(&filtered, schema, &value_column)?;
        let formatted_summary = format_summary(&aggregation.summary, &self.config.number_format);

        Ok(DashboardView {
            value_column,
            group_column,
            source_rows: dataset.row_count(),
            filtered_rows: filtered.row_count(),
            summary: aggregation.summary,
            formatted_summary,
            distinct_groups,
            chart,
            ranking,
            detail,
            controls,
            filtered,
        })
    }

    fn detail_table(
        &self,
        filtered: &Dataset,
        schema: &ColumnClassification,
        value_column: &str,
    ) -> Result<DetailTable, DataError> {
        let top = top_records(filtered, value_column, self.config.detail_rows)?;
        let value_idx = top.require_column(value_column)?;
        let kinds: Vec<Option<ColumnKind>> =
            top.columns().iter().map(|c| schema.kind_of(c)).collect();
        let rows = top
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| DetailRow {
                position: i + 1,
                cells: row
                    .iter()
                    .enumerate()
                    .map(|(c, v)| self.render_cell(v, kinds[c], c == value_idx))
                    .collect(),
            })
            .collect();
        Ok(DetailTable {
            columns: top.columns().to_vec(),
            rows,
        })
    }

    fn render_cell(&self, v: &Value, kind: Option<ColumnKind>, is_value_column: bool) -> String {
        match v {
            _ if v.is_missing() => String::new(),
            Value::Date(d) => format_date(*d, &self.config.date_pattern),
            Value::DateTime(dt) => format_date(dt.date(), &self.config.date_pattern),
            Value::Text(_) if kind == Some(ColumnKind::DateLike) => v
                .as_date()
                .map_or_else(|| v.to_string(), |d| format_date(d, &self.config.date_pattern)),
            _ if is_value_column => v
                .as_number()
                .map_or_else(|| v.to_string(), |n| self.config.number_format.format(n)),
            _ => v.to_string(),
        }
    }
}

fn format_summary(summary: &Summary, format: &NumberFormat) -> FormattedSummary {
    let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |n| format.format(n));
    FormattedSummary {
        total: format.format(summary.total),
        mean: opt(summary.mean),
        max: opt(summary.max),
        count: NumberFormat {
            decimals: 0,
            compact: false,
            ..*format
        }
        .format(summary.count as f64),
    }
}

/// Use the requested column after checking its kind, or fall back to the
/// first column of an accepted kind.
fn pick(
    requested: Option<&str>,
    schema: &ColumnClassification,
    accepted: &[ColumnKind],
    role: &str,
) -> Result<String, DataError> {
    match requested {
        Some(name) => match schema.kind_of(name) {
            None => Err(DataError::unknown_column(name)),
            Some(kind) if accepted.contains(&kind) => Ok(name.to_string()),
            Some(kind) => Err(DataError::invalid_spec(format!(
                "{role} column has kind {kind:?}, expected one of {accepted:?}"
            ))
            .with_column(name)),
        },
        None => accepted
            .iter()
            .find_map(|k| {
                schema
                    .columns()
                    .iter()
                    .find(|c| c.kind == *k)
                    .map(|c| c.name.clone())
            })
            .ok_or_else(|| DataError::invalid_spec(format!("dataset has no usable {role} column"))),
    }
}
