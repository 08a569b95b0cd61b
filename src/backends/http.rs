//! HTTP backend using reqwest

use super::{ApiRequest, ApiResponse, FormPart, HttpMethod, ImageApiBackend, TransportError};
use crate::config::SdkConfig;
use crate::error::{MiragicError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// reqwest-based transport for the image-processing API
#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a backend from the SDK configuration
    ///
    /// # Errors
    /// - API key contains characters that are not valid in a header
    /// - Failed to create HTTP client
    pub fn new(config: &SdkConfig) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|_| {
            MiragicError::configuration("API key contains characters not allowed in HTTP headers")
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .user_agent(concat!("miragic-sdk-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MiragicError::network_error("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
        })
    }

    /// Builds the full URL for a route
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build_form(parts: Vec<FormPart>) -> std::result::Result<Form, TransportError> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let file_part = Part::bytes(data)
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|e| TransportError::InvalidRequest {
                            message: e.to_string(),
                        })?;
                    form.part(name, file_part)
                },
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl ImageApiBackend for HttpBackend {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        let url = self.build_url(&request.path);
        let timeout = request.timeout.unwrap_or(self.timeout);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        if !request.parts.is_empty() {
            builder = builder.multipart(Self::build_form(request.parts)?);
        }

        let response = builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout { timeout }
            } else if e.is_connect() {
                TransportError::Connection {
                    message: e.to_string(),
                }
            } else {
                TransportError::InvalidResponse {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout { timeout }
                } else {
                    TransportError::InvalidResponse {
                        message: e.to_string(),
                    }
                }
            })?
            .to_vec();

        tracing::debug!(status, bytes = body.len(), "Received API response");

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
