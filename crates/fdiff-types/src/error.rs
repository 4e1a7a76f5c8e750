use thiserror::Error;

/// Errors produced when reading or writing the data model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors produced when loading or validating tuning configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("toml parse error: {0}")]
    Parse(String),

    #[error("threshold `{name}` must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("`{name}` must be greater than zero")]
    ZeroLength { name: &'static str },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
