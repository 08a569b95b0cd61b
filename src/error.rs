//! Error types for Miragic SDK operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, MiragicError>;

/// Boxed cause carried by remote service failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error taxonomy surfaced by every SDK operation
#[derive(Error, Debug)]
pub enum MiragicError {
    /// Missing or invalid configuration (API key, base URL, timeout, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input image path does not exist
    #[error("Input not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// Image extension or content is not in the supported set
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Operation option outside of its valid range
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Network error, timeout or non-success response from the remote API
    #[error("Remote service error: {message}")]
    RemoteService {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Local filesystem errors while writing results
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MiragicError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new input-not-found error
    pub fn input_not_found<P: AsRef<Path>>(path: P) -> Self {
        Self::InputNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Create a new invalid option error
    pub fn invalid_option<S: Into<String>>(msg: S) -> Self {
        Self::InvalidOption(msg.into())
    }

    /// Create a remote service error without an HTTP status or cause
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        Self::RemoteService {
            message: msg.into(),
            status: None,
            source: None,
        }
    }

    /// Create a remote service error for a non-success HTTP response
    pub fn remote_status<S: Into<String>>(status: u16, msg: S) -> Self {
        Self::RemoteService {
            message: format!("HTTP {}: {}", status, msg.into()),
            status: Some(status),
            source: None,
        }
    }

    /// Create a remote service error wrapping a transport-level cause
    pub fn network_error<S, E>(context: S, error: E) -> Self
    where
        S: Into<String>,
        E: Into<BoxError>,
    {
        let source = error.into();
        Self::RemoteService {
            message: format!("{}: {}", context.into(), source),
            status: None,
            source: Some(source),
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, error: &std::io::Error) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create option error with valid range
    pub fn option_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
    ) -> Self {
        Self::InvalidOption(format!(
            "Invalid {}: {} (valid range: {})",
            parameter, value, valid_range
        ))
    }

    /// HTTP status of a remote failure, if the service answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteService { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether a retry could succeed
    ///
    /// Only remote failures qualify: transport errors without a status,
    /// request timeouts (408), rate limiting (429) and server errors (5xx).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteService { status: None, .. } => true,
            Self::RemoteService {
                status: Some(code), ..
            } => *code == 408 || *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MiragicError::configuration("missing key");
        assert!(matches!(err, MiragicError::Configuration(_)));

        let err = MiragicError::unsupported_format("gif");
        assert!(matches!(err, MiragicError::UnsupportedFormat(_)));

        let err = MiragicError::input_not_found("/nope.jpg");
        assert!(matches!(err, MiragicError::InputNotFound { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = MiragicError::configuration("MIRAGIC_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: MIRAGIC_API_KEY is not set"
        );

        let err = MiragicError::input_not_found("photos/cat.jpg");
        assert_eq!(err.to_string(), "Input not found: photos/cat.jpg");

        let err = MiragicError::remote_status(503, "maintenance");
        assert_eq!(
            err.to_string(),
            "Remote service error: HTTP 503: maintenance"
        );
    }

    #[test]
    fn test_option_value_error() {
        let err = MiragicError::option_value_error("threshold", 300, "0-255");
        let error_string = err.to_string();
        assert!(error_string.contains("threshold"));
        assert!(error_string.contains("300"));
        assert!(error_string.contains("0-255"));
    }

    #[test]
    fn test_file_io_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = MiragicError::file_io_error("write output", Path::new("/out/a.png"), &io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("write output"));
        assert!(error_string.contains("/out/a.png"));
    }

    #[test]
    fn test_network_error_keeps_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = MiragicError::network_error("POST /upscale failed", io_error);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("refused"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(MiragicError::remote("connection reset").is_retryable());
        assert!(MiragicError::remote_status(500, "boom").is_retryable());
        assert!(MiragicError::remote_status(503, "busy").is_retryable());
        assert!(MiragicError::remote_status(429, "slow down").is_retryable());
        assert!(MiragicError::remote_status(408, "timeout").is_retryable());

        for status in [400, 401] {
            assert!(!MiragicError::remote_status(status, "client error").is_retryable());
        }
        assert!(!MiragicError::invalid_option("threshold").is_retryable());
        assert!(!MiragicError::input_not_found("x.jpg").is_retryable());
    }
}
