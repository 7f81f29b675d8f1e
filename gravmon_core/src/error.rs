use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MonitorError {
    /// The device cannot sense motion; `start()` refuses to subscribe.
    #[error("motion sensing unavailable")]
    Unavailable,
    #[error("motion source error: {0}")]
    Source(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
