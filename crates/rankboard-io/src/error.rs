use rankboard_common::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },

    #[error("unsupported {feature}: {context}")]
    Unsupported { feature: String, context: String },

    #[error("bad header: {0}")]
    Header(String),

    #[error("fetch of {url} failed: {message}")]
    Fetch { url: String, message: String },
}

impl IoError {
    pub fn from_backend<E: std::fmt::Display>(backend: &str, err: E) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

/// Every load failure surfaces to the core as an unparseable source, never
/// as an empty dataset.
impl From<IoError> for DataError {
    fn from(err: IoError) -> Self {
        DataError::unparseable(err.to_string())
    }
}
