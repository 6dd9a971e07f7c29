//! Data sources for rankboard dashboards.
//!
//! Every adapter implements [`DataSource`] and yields a
//! [`rankboard_common::Dataset`]; load failures are [`IoError`]s, which
//! convert into `DataError::UnparseableSource` at the core boundary.
//! [`SourceCache`] memoizes loads with a TTL.

pub mod backends;
pub mod cache;
pub mod clock;
pub mod error;
pub mod loader;
pub mod sample;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::ExcelSource;
#[cfg(feature = "json")]
pub use backends::JsonSource;
#[cfg(feature = "webservice")]
pub use backends::RemoteCsvSource;
#[cfg(feature = "csv")]
pub use backends::{
    CsvNewline, CsvQuoteStyle, CsvReadOptions, CsvSource, CsvTrim, CsvTypeInference,
    CsvWriteOptions, write_dataset_csv, write_dataset_csv_to_path,
};
pub use cache::{CacheConfig, DEFAULT_TTL, SourceCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::IoError;
pub use loader::{LoaderStats, build_dataset, unique_headers};
pub use sample::SampleSource;
pub use traits::DataSource;

#[cfg(feature = "system-clock")]
pub use clock::today;

// Re-export for convenience
pub use rankboard_common::Dataset;
