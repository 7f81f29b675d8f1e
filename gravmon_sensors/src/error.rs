use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source already subscribed")]
    Busy,
    #[error("motion sensing unavailable")]
    Unavailable,
    #[error("parse: {0}")]
    Parse(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
