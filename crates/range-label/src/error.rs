//! Error types for range-label operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid templates: {0}")]
    InvalidTemplates(String),
}

pub type Result<T> = std::result::Result<T, RangeError>;
