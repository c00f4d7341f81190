//! Error types for casting agency operations

/// Crate-level error type
#[derive(Debug, thiserror::Error)]
pub enum AgencyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AgencyError>;
