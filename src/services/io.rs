//! Image I/O operations service
//!
//! This module separates file I/O from the remote calls: resolving the
//! input image, checking formats, and writing results atomically.

use crate::error::{MiragicError, Result};
use crate::utils::PathValidator;
use image::ImageFormat;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Image handed to an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Image file on disk
    Path(PathBuf),
    /// Encoded image already in memory
    Bytes(Vec<u8>),
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for ImageInput {
    fn from(path: &PathBuf) -> Self {
        Self::Path(path.clone())
    }
}

impl From<&str> for ImageInput {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for ImageInput {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageInput {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl ImageInput {
    /// Short description for logs
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Input image ready to be uploaded
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Resolve an input into uploadable bytes
    ///
    /// # Arguments
    /// * `input` - File path or in-memory image
    /// * `supported` - Accepted extensions (lowercase, without dot)
    ///
    /// # Errors
    /// - `InputNotFound` if a path input does not exist
    /// - `UnsupportedFormat` if the extension or the detected content type is
    ///   not accepted
    /// - `Io` if the file cannot be read
    pub fn load_input(input: &ImageInput, supported: &[String]) -> Result<ResolvedImage> {
        match input {
            ImageInput::Path(path) => {
                PathValidator::validate_file_exists(path)?;
                PathValidator::validate_image_extension(path, supported)?;

                let data = std::fs::read(path)
                    .map_err(|e| MiragicError::file_io_error("read input image", path, &e))?;

                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("image")
                    .to_string();

                log::debug!("Loaded {} ({} bytes)", path.display(), data.len());

                Ok(ResolvedImage {
                    content_type: Self::content_type_for_path(path),
                    data,
                    filename,
                })
            },
            ImageInput::Bytes(bytes) => {
                let format = Self::detect_format(bytes, supported)?;
                let extension = format.extensions_str().first().copied().unwrap_or("bin");

                Ok(ResolvedImage {
                    data: bytes.clone(),
                    filename: format!("image.{}", extension),
                    content_type: Self::content_type_for_format(format),
                })
            },
        }
    }

    /// Detect the format of in-memory image data
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the content is unrecognizable or its format is
    ///   not in `supported`
    pub fn detect_format(bytes: &[u8], supported: &[String]) -> Result<ImageFormat> {
        let format = image::guess_format(bytes).map_err(|_| {
            MiragicError::unsupported_format(format!(
                "Could not detect image format of {} bytes of input data",
                bytes.len()
            ))
        })?;

        let accepted = format
            .extensions_str()
            .iter()
            .any(|ext| supported.iter().any(|s| s == ext));
        if !accepted {
            return Err(MiragicError::unsupported_format(format!(
                "{:?} images are not supported. Supported formats: {}",
                format,
                supported.join(", ")
            )));
        }

        Ok(format)
    }

    /// MIME type for a file based on its extension
    #[must_use]
    pub fn content_type_for_path(path: &Path) -> &'static str {
        path.extension()
            .and_then(ImageFormat::from_extension)
            .map_or("application/octet-stream", Self::content_type_for_format)
    }

    /// MIME type for an image format
    #[must_use]
    pub fn content_type_for_format(format: ImageFormat) -> &'static str {
        match format {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            _ => "application/octet-stream",
        }
    }

    /// Write result bytes to `output` atomically
    ///
    /// The data goes to a temporary file next to the target and is renamed
    /// into place once fully written. On failure the temporary file is
    /// removed and the target is left untouched.
    ///
    /// # Errors
    /// - `Io` if the directory cannot be created or the write/rename fails
    ///
    /// # Examples
    /// ```rust,no_run
    /// use miragic_sdk::services::ImageIOService;
    ///
    /// ImageIOService::write_output_atomic("output/result.png", b"\x89PNG...")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_output_atomic<P: AsRef<Path>>(output: P, data: &[u8]) -> Result<()> {
        let output = output.as_ref();
        PathValidator::ensure_parent_dirs(output)?;

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::Builder::new()
            .prefix(".miragic-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| MiragicError::file_io_error("create temporary file in", dir, &e))?;

        temp.write_all(data)
            .and_then(|()| temp.flush())
            .map_err(|e| MiragicError::file_io_error("write temporary file for", output, &e))?;

        temp.persist(output)
            .map_err(|e| MiragicError::file_io_error("save output image", output, &e.error))?;

        log::debug!("Wrote {} bytes to {}", data.len(), output.display());
        Ok(())
    }
}
