// Error types for issue-lifespan.
// Covers transport, cache, configuration and input errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifespanError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid repository identifier {0:?}: expected owner/name or owner/")]
    InvalidTarget(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LifespanError>;
