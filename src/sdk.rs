//! SDK façade
//!
//! `MiragicSdk` is the entry point most callers need: build it once from an
//! [`SdkConfig`] and call one method per operation.

use crate::{
    backends::{HttpBackend, ImageApiBackend},
    config::SdkConfig,
    error::Result,
    features::{BackgroundRemover, BlurBackground, ImageUpscaler},
    options::{BlurOptions, RemoveBackgroundOptions, UpscaleOptions},
    processor::OperationProcessor,
    retry::RetryPolicy,
    services::ImageInput,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Route reporting service health
pub const STATUS_ENDPOINT: &str = "/status";
/// Route reporting account usage
pub const USAGE_ENDPOINT: &str = "/usage";

/// Client for the Miragic image-processing API
///
/// # Examples
/// ```rust,no_run
/// use miragic_sdk::{MiragicSdk, RemoveBackgroundOptions, SdkConfig};
///
/// # async fn example() -> miragic_sdk::Result<()> {
/// let sdk = MiragicSdk::new(SdkConfig::from_env()?)?;
/// let options = RemoveBackgroundOptions::default().with_threshold(150);
/// sdk.remove_background("input/photo.jpg", "output/photo.png", &options)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MiragicSdk {
    processor: OperationProcessor,
    background_remover: BackgroundRemover,
    image_upscaler: ImageUpscaler,
    blur_background: BlurBackground,
}

impl MiragicSdk {
    /// Create the SDK with the HTTP backend
    ///
    /// # Errors
    /// - `Configuration` if the API key cannot be sent as a header
    /// - `RemoteService` if the HTTP client cannot be built
    pub fn new(config: SdkConfig) -> Result<Self> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create the SDK with a custom transport
    #[must_use]
    pub fn with_backend(config: SdkConfig, backend: Arc<dyn ImageApiBackend>) -> Self {
        log::debug!(
            "Initializing Miragic SDK v{} ({} backend, {})",
            Self::get_version(),
            backend.name(),
            config.api_base_url
        );

        let processor = OperationProcessor::new(backend, Arc::new(config));
        Self {
            background_remover: BackgroundRemover::new(processor.clone()),
            image_upscaler: ImageUpscaler::new(processor.clone()),
            blur_background: BlurBackground::new(processor.clone()),
            processor,
        }
    }

    /// Replace the retry policy derived from `max_retries`
    #[must_use]
    pub fn with_retry_policy(self, retry: RetryPolicy) -> Self {
        let processor = self.processor.with_retry_policy(retry);
        Self {
            background_remover: BackgroundRemover::new(processor.clone()),
            image_upscaler: ImageUpscaler::new(processor.clone()),
            blur_background: BlurBackground::new(processor.clone()),
            processor,
        }
    }

    /// Remove the background of an image
    ///
    /// # Errors
    /// - `InvalidOption`, `InputNotFound`, `UnsupportedFormat`,
    ///   `RemoteService` or `Io`
    pub async fn remove_background<I, P>(
        &self,
        input: I,
        output: P,
        options: &RemoveBackgroundOptions,
    ) -> Result<PathBuf>
    where
        I: Into<ImageInput> + Send,
        P: AsRef<Path> + Send,
    {
        self.background_remover
            .remove_background(input, output, options)
            .await
    }

    /// Upscale an image by `options.scale_factor`
    ///
    /// # Errors
    /// - `InvalidOption`, `InputNotFound`, `UnsupportedFormat`,
    ///   `RemoteService` or `Io`
    pub async fn upscale_image<I, P>(
        &self,
        input: I,
        output: P,
        options: &UpscaleOptions,
    ) -> Result<PathBuf>
    where
        I: Into<ImageInput> + Send,
        P: AsRef<Path> + Send,
    {
        self.image_upscaler.upscale(input, output, options).await
    }

    /// Blur the background of an image
    ///
    /// # Errors
    /// - `InvalidOption`, `InputNotFound`, `UnsupportedFormat`,
    ///   `RemoteService` or `Io`
    pub async fn blur_background<I, P>(
        &self,
        input: I,
        output: P,
        options: &BlurOptions,
    ) -> Result<PathBuf>
    where
        I: Into<ImageInput> + Send,
        P: AsRef<Path> + Send,
    {
        self.blur_background
            .apply_blur(input, output, options)
            .await
    }

    /// SDK version
    #[must_use]
    pub fn get_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Service status as reported by the API
    ///
    /// # Errors
    /// - `RemoteService` on transport failure, non-2xx or invalid JSON
    pub async fn get_api_status(&self) -> Result<serde_json::Value> {
        self.processor.get_json(STATUS_ENDPOINT).await
    }

    /// Account usage statistics as reported by the API
    ///
    /// # Errors
    /// - `RemoteService` on transport failure, non-2xx or invalid JSON
    pub async fn get_usage_stats(&self) -> Result<serde_json::Value> {
        self.processor.get_json(USAGE_ENDPOINT).await
    }

    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        self.processor.config()
    }

    #[must_use]
    pub fn background_remover(&self) -> &BackgroundRemover {
        &self.background_remover
    }

    #[must_use]
    pub fn image_upscaler(&self) -> &ImageUpscaler {
        &self.image_upscaler
    }

    #[must_use]
    pub fn blur(&self) -> &BlurBackground {
        &self.blur_background
    }
}
