//! Error types for datespan operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatespanError {
    #[error("Invalid timezone: '{0}'")]
    InvalidTimezone(String),

    #[error("Invalid datetime for {field}: '{value}'")]
    InvalidDatetime { field: String, value: String },

    #[error("Invalid {field}: '{value}' (expected {expected})")]
    InvalidField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("'{value}' cannot be parsed as a datespan")]
    UnparseableSpan {
        value: String,
        #[source]
        source: Box<DatespanError>,
    },
}

impl DatespanError {
    pub(crate) fn datetime(field: &str, value: impl ToString) -> Self {
        Self::InvalidDatetime {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn field(field: &'static str, value: impl ToString, expected: &'static str) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatespanError>;
