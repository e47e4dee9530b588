use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("missing source setting: {0}")]
    MissingSetting(&'static str),
    #[error("invalid search options: {0}")]
    InvalidOptions(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "http-source")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "http-source")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
