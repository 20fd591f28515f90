use thiserror::Error;

/// Errors raised by session-state mutations and the progression calculator.
/// All of these are local to a single user action; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(&'static str),

    /// The template or program state is missing data the operation needs
    /// (e.g. a lift without a target weight). Fail fast rather than produce
    /// nonsensical output.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Set number, exercise index, or rating outside valid bounds.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
