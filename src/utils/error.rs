// src/utils/error.rs
use thiserror::Error;

// Errors raised while talking to the Congress.gov API or downloading documents
#[derive(Error, Debug)]
pub enum CongressError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Covers transport failures and timeouts

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to parse Congress.gov response: {0}")]
    Parse(String),
}

/// The public failure taxonomy of the extraction core.
///
/// Messages are short and fixed so callers never see transport or parser
/// internals; the details are logged where the failure happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl ExtractionError {
    /// Stable tag for the error kind, used in CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::BadRequest(_) => "BadRequest",
            ExtractionError::NotFound(_) => "NotFound",
            ExtractionError::Upstream(_) => "UpstreamError",
        }
    }
}

impl From<CongressError> for ExtractionError {
    fn from(err: CongressError) -> Self {
        match err {
            CongressError::NotFound(_) => ExtractionError::NotFound("bill not found".to_string()),
            other => {
                tracing::error!("Upstream lookup failed: {}", other);
                ExtractionError::Upstream("upstream request failed".to_string())
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Interrupted before the request completed")]
    Interrupted,
}
