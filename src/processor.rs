//! Shared request pipeline for remote image operations
//!
//! `OperationProcessor` holds the transport, configuration and retry policy
//! and runs the fixed sequence every operation goes through: validate
//! options, resolve the input, check the output path, call the API, write
//! the result. Feature clients are thin wrappers choosing the operation and
//! its option type.

use crate::{
    backends::{ApiRequest, ApiResponse, FormPart, ImageApiBackend},
    config::SdkConfig,
    error::{MiragicError, Result},
    options::OperationOptions,
    retry::RetryPolicy,
    services::{ImageIOService, ImageInput},
    utils::PathValidator,
};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info as trace_info, instrument};

/// Longest raw error body quoted in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Remote operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RemoveBackground,
    BlurBackground,
    Upscale,
}

impl Operation {
    /// API route of the operation
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::RemoveBackground => "/remove-background",
            Self::BlurBackground => "/blur-background",
            Self::Upscale => "/upscale",
        }
    }

    /// Human-readable name for logs and progress output
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveBackground => "background removal",
            Self::BlurBackground => "background blur",
            Self::Upscale => "upscaling",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Executes remote operations against one backend
#[derive(Clone)]
pub struct OperationProcessor {
    backend: Arc<dyn ImageApiBackend>,
    config: Arc<SdkConfig>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for OperationProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationProcessor")
            .field("backend", &self.backend.name())
            .field("api_base_url", &self.config.api_base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl OperationProcessor {
    /// Create a processor; the retry policy follows `config.max_retries`
    #[must_use]
    pub fn new(backend: Arc<dyn ImageApiBackend>, config: Arc<SdkConfig>) -> Self {
        let retry = RetryPolicy::from(config.as_ref());
        Self {
            backend,
            config,
            retry,
        }
    }

    /// Replace the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Run one operation and write its result to `output`
    ///
    /// # Errors
    ///
    /// Returns `MiragicError` for:
    /// - `InvalidOption` when an option is out of range
    /// - `InputNotFound` / `UnsupportedFormat` for unusable inputs or output paths
    /// - `RemoteService` for transport failures, non-2xx responses and empty bodies
    /// - `Io` when the result cannot be written
    #[instrument(
        skip(self, input, output, options),
        fields(operation = %operation, backend = self.backend.name())
    )]
    pub async fn execute<O: OperationOptions>(
        &self,
        operation: Operation,
        input: &ImageInput,
        output: &Path,
        options: &O,
    ) -> Result<PathBuf> {
        let start = Instant::now();

        options.validate()?;

        let image = ImageIOService::load_input(input, &self.config.supported_formats)?;
        PathValidator::validate_image_extension(output, &self.config.supported_formats)?;

        trace_info!(
            input = %input.describe(),
            output = %output.display(),
            bytes = image.data.len(),
            "🎯 Starting {}", operation
        );

        let mut request = ApiRequest::post(operation.endpoint())
            .with_timeout(self.config.timeout())
            .with_part(FormPart::file(
                "image",
                image.filename,
                image.content_type,
                image.data,
            ));
        for (name, value) in options.form_fields() {
            request = request.with_part(FormPart::text(name, value));
        }

        let response = self.send_checked(operation.name(), request).await?;
        if response.body.is_empty() {
            return Err(MiragicError::remote(format!(
                "{} returned an empty image",
                operation.endpoint()
            )));
        }

        ImageIOService::write_output_atomic(output, &response.body)?;

        info!(
            "Completed {} for {} in {:.2}s",
            operation,
            input.describe(),
            start.elapsed().as_secs_f64()
        );
        Ok(output.to_path_buf())
    }

    /// GET a JSON object from the API
    ///
    /// # Errors
    /// - `RemoteService` for transport failures, non-2xx responses or a body
    ///   that is not valid JSON
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let request = ApiRequest::get(path).with_timeout(self.config.timeout());
        let response = self.send_checked(path, request).await?;

        serde_json::from_slice(&response.body).map_err(|e| {
            MiragicError::network_error(format!("Invalid JSON from {}", path), e)
        })
    }

    /// Send a request under the retry policy, turning non-2xx into errors
    async fn send_checked(&self, label: &str, request: ApiRequest) -> Result<ApiResponse> {
        self.retry
            .execute(label, || {
                let request = request.clone();
                async move {
                    let path = request.path.clone();
                    let response = self.backend.send(request).await.map_err(|e| {
                        MiragicError::network_error(format!("Request to {} failed", path), e)
                    })?;

                    debug!("{} answered HTTP {}", path, response.status);

                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(MiragicError::remote_status(
                            response.status,
                            extract_error_message(&response.body),
                        ))
                    }
                }
            })
            .await
    }
}

/// Best-effort error message from an API error body
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}`,
/// `{"message": ...}` and `{"detail": ...}`. Anything else is reported as
/// truncated text.
#[must_use]
pub fn extract_error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        let message = ["/error/message", "/error", "/message", "/detail"]
            .iter()
            .find_map(|pointer| value.pointer(pointer).and_then(serde_json::Value::as_str));
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "no error details".to_string();
    }
    if text.chars().count() > MAX_ERROR_BODY_CHARS {
        let truncated: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
