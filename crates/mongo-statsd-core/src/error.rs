//! Shared error type across mongo-statsd crates.

use thiserror::Error;

/// Stable error categories, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid flag, environment variable, or config file.
    Config,
    /// Database connect or command failure.
    Fetch,
    /// Status document did not match the expected shape.
    Decode,
    /// Metrics sink construction or send failure.
    Sink,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::Fetch => "FETCH",
            ErrorKind::Decode => "DECODE",
            ErrorKind::Sink => "SINK",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("config: {0}")]
    Config(String),
    #[error("fetch: {0}")]
    Fetch(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("sink: {0}")]
    Sink(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExporterError::Config(_) => ErrorKind::Config,
            ExporterError::Fetch(_) => ErrorKind::Fetch,
            ExporterError::Decode(_) => ErrorKind::Decode,
            ExporterError::Sink(_) => ErrorKind::Sink,
            ExporterError::Internal(_) => ErrorKind::Internal,
        }
    }
}
