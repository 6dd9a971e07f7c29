//! Pure dataset core for rankboard dashboards.
//!
//! Three operations make up the host-facing surface:
//!
//! - [`classify_columns`]: numeric / date-like / categorical partition
//! - [`apply_filters`]: categorical AND date-window filtering
//! - [`aggregate`]: summary metrics plus ranked, truncated group totals
//!
//! [`Pipeline`] strings them together for one dashboard request. Nothing in
//! this crate performs I/O or keeps state between calls.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod filter;
pub mod format;
pub mod pipeline;
pub mod ranking;
mod sum;

pub use aggregate::{
    Aggregation, AggregationSpec, GroupKey, GroupTotal, Series, SeriesPoint, Summary, aggregate,
    distinct_count, group_totals, grouped_series, summarize, top_records,
};
pub use classify::{ClassifiedColumn, ColumnClassification, ColumnKind, classify_columns};
pub use config::DashboardConfig;
pub use filter::{
    ColumnFilter, DateWindow, FilterOption, FilterSelection, apply_filters, filter_options,
};
pub use format::{NumberFormat, format_date, is_valid_date_pattern};
pub use pipeline::{
    Controls, DashboardRequest, DashboardView, DetailRow, DetailTable, FormattedSummary, Pipeline,
};
pub use ranking::{RankingRow, rank};

// Re-export for convenience
pub use rankboard_common::{DataError, DataErrorKind, Dataset, Value};
