//! Enums shared across the checkout payment core.

pub mod enums;

pub use enums::*;
