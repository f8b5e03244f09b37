//! Advisory errors
//!
//! These never leave the requester: every failure becomes the fallback tip.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory service not configured: {0}")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response")]
    EmptyResponse,

    #[error("advisory service failed: {0}")]
    Service(String),
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;
