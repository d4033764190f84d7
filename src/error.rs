// src/error.rs
use thiserror::Error;

/// Everything that can abort an import, a fetch, a save/load or a render.
#[derive(Debug, Error)]
pub enum QualisError {
    /// Malformed input document or flat file.
    #[error("format error: {0}")]
    Format(String),

    /// The remote page no longer matches the dialect's expected markup.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Network/transport failure, timeout or HTTP error status.
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QualisError>;

impl From<reqwest::Error> for QualisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return QualisError::Fetch(format!("request timed out: {e}"));
        }
        QualisError::Fetch(e.to_string())
    }
}

impl From<image::ImageError> for QualisError {
    fn from(e: image::ImageError) -> Self {
        QualisError::Render(e.to_string())
    }
}
