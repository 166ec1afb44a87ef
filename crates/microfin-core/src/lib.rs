pub mod error;
pub mod rounding;
pub mod types;

#[cfg(feature = "commission")]
pub mod commission;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use error::MicrofinError;
pub use types::*;

/// Standard result type for all microfin operations
pub type MicrofinResult<T> = Result<T, MicrofinError>;
