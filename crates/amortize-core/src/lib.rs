pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "advisory")]
pub mod advisory;

pub use error::AmortizeError;
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortizeResult<T> = Result<T, AmortizeError>;
