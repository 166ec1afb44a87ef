use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MicrofinError {
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: Decimal, reason: String },

    #[error("Invalid term {term}: {reason}")]
    InvalidTerm { term: i64, reason: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MicrofinError {
    fn from(e: serde_json::Error) -> Self {
        MicrofinError::SerializationError(e.to_string())
    }
}
