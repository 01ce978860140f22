use std::io;

use thiserror::Error;

/// Failure to deliver a record.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to write log record: {0}")]
    Io(#[from] io::Error),
}

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
