use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid limit: {0} (must be positive)")]
    InvalidLimit(i64),

    #[error("Unknown filter attribute(s): {}", .0.join(", "))]
    UnknownAttribute(Vec<String>),

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Card not found: {0}")]
    CardNotFound(u64),

    #[error("Card key already in use: {0}")]
    DuplicateKey(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// True for errors caused by the request itself rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidQuery(_) | Error::InvalidLimit(_) | Error::UnknownAttribute(_)
        )
    }
}
