//! Service layer
//!
//! File I/O lives here so the feature clients only orchestrate requests.

pub mod io;

pub use io::{ImageIOService, ImageInput, ResolvedImage};
