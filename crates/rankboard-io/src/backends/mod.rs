#[cfg(feature = "calamine")]
pub mod calamine;
#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "webservice")]
pub mod remote;

#[cfg(feature = "calamine")]
pub use self::calamine::ExcelSource;
#[cfg(feature = "csv")]
pub use self::csv::{
    CsvNewline, CsvQuoteStyle, CsvReadOptions, CsvSource, CsvTrim, CsvTypeInference,
    CsvWriteOptions, read_csv, write_dataset_csv, write_dataset_csv_to_path,
};
#[cfg(feature = "json")]
pub use json::{JsonSource, read_json_records};
#[cfg(feature = "webservice")]
pub use remote::{RemoteCsvSource, google_export_url};
