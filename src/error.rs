//! Error types for the quadrature pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuadError>;

#[derive(Debug, Error)]
pub enum QuadError {
    /// Storage for the center set or the output field could not be reserved.
    #[error("unable to allocate {what} ({len} values)")]
    Allocation { what: &'static str, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("unable to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("GPU error: {0}")]
    Gpu(String),
}
