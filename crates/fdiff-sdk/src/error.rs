use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("model error: {0}")]
    Model(#[from] fdiff_types::ModelError),

    #[error("config error: {0}")]
    Config(#[from] fdiff_types::ConfigError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid ticker: {0:?}")]
    InvalidTicker(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
