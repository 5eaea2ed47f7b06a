use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortizeError {
    #[error("Invalid amount: {0} (principal must be positive)")]
    InvalidAmount(Decimal),

    #[error("Invalid rate: {0}% (annual interest rate cannot be negative)")]
    InvalidRate(Decimal),

    #[error("Invalid term: {years} years, {reason}")]
    InvalidTerm { years: Decimal, reason: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AmortizeError {
    /// Name of the input field that failed validation, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AmortizeError::InvalidAmount(_) => Some("amount"),
            AmortizeError::InvalidRate(_) => Some("rate"),
            AmortizeError::InvalidTerm { .. } => Some("years"),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AmortizeError {
    fn from(e: serde_json::Error) -> Self {
        AmortizeError::SerializationError(e.to_string())
    }
}
