//! Error types for Monedero

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation service error: {0}")]
    Upstream(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Generation service not configured: {0}")]
    NotConfigured(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs can carry credentials
        let err = err.without_url();
        if err.is_timeout() {
            Error::Upstream(format!("request timed out: {}", err))
        } else {
            Error::Upstream(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
