//! Consolidated validation utilities
//!
//! Range checks for operation options and path checks for inputs and
//! outputs live here so every feature client validates the same way.

pub mod numeric;
pub mod path;

pub use numeric::NumericValidator;
pub use path::PathValidator;
