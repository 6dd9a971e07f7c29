//! Meta crate that re-exports the rankboard building blocks with sensible
//! defaults. Depend on this crate and opt into data sources via feature
//! flags; the underlying crates stay reachable for deeper integration.

pub use rankboard_common as common;
pub use rankboard_core as analytics;

#[cfg(feature = "io")]
pub use rankboard_io as io;

pub use rankboard_common::{DataError, DataErrorKind, Dataset, Value};
pub use rankboard_core::{
    Aggregation, AggregationSpec, ColumnClassification, ColumnFilter, ColumnKind,
    DashboardConfig, DashboardRequest, DashboardView, DateWindow, FilterSelection, GroupTotal,
    NumberFormat, Pipeline, RankingRow, Summary, aggregate, apply_filters, classify_columns,
};

#[cfg(feature = "io")]
pub use rankboard_io::{CacheConfig, DataSource, IoError, SampleSource, SourceCache};

#[cfg(feature = "csv")]
pub use rankboard_io::{CsvSource, write_dataset_csv};

#[cfg(feature = "json")]
pub use rankboard_io::JsonSource;

#[cfg(feature = "calamine")]
pub use rankboard_io::ExcelSource;

#[cfg(feature = "webservice")]
pub use rankboard_io::RemoteCsvSource;

#[cfg(feature = "csv")]
#[doc(hidden)]
pub mod doc_examples;
