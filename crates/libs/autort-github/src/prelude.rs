//! Common types and utilities.

/// GitHub interface error type.
pub use crate::error::Error;

/// GitHub interface result type.
pub type Result<T> = core::result::Result<T, Error>;
