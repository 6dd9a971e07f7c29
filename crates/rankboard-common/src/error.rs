//! Error representation for the dataset pipeline.
//!
//! - **`DataErrorKind`** : the three failure classes a host must distinguish
//! - **`DataError`**     : kind plus optional message and offending column
//!
//! `EmptyDataset` is not fatal: hosts show a neutral state instead of
//! charts. `InvalidSpecification` is fatal to the call and must reach the
//! user. `UnparseableSource` comes from data source adapters only.

use std::{error::Error, fmt};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DataErrorKind {
    EmptyDataset,
    InvalidSpecification,
    UnparseableSource,
}

impl fmt::Display for DataErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptyDataset => "empty dataset",
            Self::InvalidSpecification => "invalid specification",
            Self::UnparseableSource => "unparseable source",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataError {
    pub kind: DataErrorKind,
    pub message: Option<String>,
    pub column: Option<String>,
}

/* ───────────────────── Constructors & helpers ─────────────────────── */

impl From<DataErrorKind> for DataError {
    fn from(kind: DataErrorKind) -> Self {
        Self {
            kind,
            message: None,
            column: None,
        }
    }
}

impl DataError {
    pub fn new(kind: DataErrorKind) -> Self {
        kind.into()
    }

    pub fn empty_dataset() -> Self {
        Self::new(DataErrorKind::EmptyDataset)
    }

    pub fn invalid_spec<S: Into<String>>(msg: S) -> Self {
        Self::new(DataErrorKind::InvalidSpecification).with_message(msg)
    }

    pub fn unparseable<S: Into<String>>(msg: S) -> Self {
        Self::new(DataErrorKind::UnparseableSource).with_message(msg)
    }

    /// Shorthand for the most common specification failure.
    pub fn unknown_column(column: &str) -> Self {
        Self::invalid_spec("column not found").with_column(column)
    }

    /// Attach a human-readable explanation.
    pub fn with_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Attach the column the error is about.
    pub fn with_column<S: Into<String>>(mut self, column: S) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn is_empty_dataset(&self) -> bool {
        self.kind == DataErrorKind::EmptyDataset
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref msg) = self.message {
            write!(f, ": {msg}")?;
        }
        if let Some(ref col) = self.column {
            write!(f, " (column '{col}')")?;
        }
        Ok(())
    }
}

impl Error for DataError {}

impl From<DataError> for String {
    fn from(error: DataError) -> Self {
        format!("{error}")
    }
}
