//! Common utilities for the checkout payment core.

pub mod consts;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{CustomResult, ParsingError, ValidationError};
