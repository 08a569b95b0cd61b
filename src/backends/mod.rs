//! Transport backends for the remote image-processing API
//!
//! This module provides the transports the feature clients send requests through:
//! - HTTP backend (reqwest, used in production)
//! - Mock backend (queued responses and request recording, used in tests and demos)

pub mod http;
pub mod mock;

pub use self::http::HttpBackend;
pub use self::mock::{MockBackend, RecordedRequest};

use async_trait::async_trait;
use std::time::Duration;

/// HTTP method used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A part of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Text field
    Text { name: String, value: String },
    /// File field
    File {
        name: String,
        filename: String,
        content_type: String,
        data: Vec<u8>,
    },
}

impl FormPart {
    pub fn text<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file<N, F, C>(name: N, filename: F, content_type: C, data: Vec<u8>) -> Self
    where
        N: Into<String>,
        F: Into<String>,
        C: Into<String>,
    {
        Self::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Field name of the part
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Request to the image-processing API, relative to the configured base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Route below the base URL, e.g. `/upscale`
    pub path: String,
    /// Multipart form parts (empty for GET)
    pub parts: Vec<FormPart>,
    /// Per-request timeout override
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get<S: Into<String>>(path: S) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            parts: Vec::new(),
            timeout: None,
        }
    }

    pub fn post<S: Into<String>>(path: S) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            parts: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_part(mut self, part: FormPart) -> Self {
        self.parts.push(part);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of a text field, if present
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Raw response from the API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns true if the status indicates success (2xx)
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures, before any HTTP status is known
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not connect to the API host
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// Request exceeded the configured timeout
    #[error("Timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Request could not be built (bad header, bad content type, ...)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Response body could not be read
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Transport used by the feature clients to reach the API
///
/// Implementations handle authentication and URL construction; callers only
/// deal with routes, form parts and raw responses.
#[async_trait]
pub trait ImageApiBackend: Send + Sync {
    /// Send one request and return the raw response, whatever its status
    ///
    /// # Errors
    /// - `TransportError` when no HTTP response was received
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
