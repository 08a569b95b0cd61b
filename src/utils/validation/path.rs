//! Path validation utilities
//!
//! Provides centralized validation for input paths, extensions, and output
//! directories.

use crate::error::{MiragicError, Result};
use std::path::Path;

/// Validator for file system paths and extensions
pub struct PathValidator;

impl PathValidator {
    /// Validate that an input file exists
    pub fn validate_file_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path_ref = path.as_ref();
        if !path_ref.is_file() {
            return Err(MiragicError::input_not_found(path_ref));
        }
        Ok(())
    }

    /// Validate that a path has one of the given extensions (case-insensitive)
    pub fn validate_image_extension<P: AsRef<Path>>(path: P, supported: &[String]) -> Result<()> {
        let path_ref = path.as_ref();

        if !Self::has_extension(path_ref, supported) {
            let extension = path_ref
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("(no extension)");

            return Err(MiragicError::unsupported_format(format!(
                "'{}' has extension '{}'. Supported formats: {}",
                path_ref.display(),
                extension,
                supported.join(", ")
            )));
        }
        Ok(())
    }

    /// Check if a file path has one of the given extensions
    pub fn has_extension<P: AsRef<Path>>(path: P, supported: &[String]) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| supported.iter().any(|s| *s == ext))
    }

    /// Create parent directories if they don't exist
    pub fn ensure_parent_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MiragicError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }
        Ok(())
    }
}
