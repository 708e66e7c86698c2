use thiserror::Error;

use crate::api::bls::ApiError;

/// Every way a run can fail. All of them end the run; nothing is retried.
#[derive(Debug, Error)]
pub enum JobsError {
    /// Connection, DNS or timeout failure before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered, but with a failure
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Insufficient data: {0}")]
    EmptyData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl From<reqwest::Error> for JobsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            JobsError::Network(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            JobsError::Network(format!("Connection failed: {}", e))
        } else {
            JobsError::Network(format!("Request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for JobsError {
    fn from(e: serde_json::Error) -> Self {
        JobsError::Parse(format!("Failed to parse response: {}", e))
    }
}
