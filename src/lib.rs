#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Miragic SDK
//!
//! Client library for the Miragic image-processing API: background removal,
//! background blur and image upscaling. Images are uploaded to the remote
//! service and the processed result is written to the requested path.
//!
//! ## Features
//!
//! - **Background removal** with threshold, edge refinement and hair detection
//! - **Background blur** with adjustable strength, center focus and presets
//! - **Upscaling** by 1-8x with lanczos, bicubic or nearest resampling
//! - **Batch processing** with per-file error isolation
//! - **Atomic output writes**: a failed call never leaves a partial file
//! - **Opt-in retries** with exponential backoff for transient API failures
//! - **CLI Integration**: the `miragic` binary (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use miragic_sdk::{BlurOptions, MiragicSdk, SdkConfig, UpscaleOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Reads MIRAGIC_API_KEY and friends from the environment
//! let sdk = MiragicSdk::new(SdkConfig::from_env()?)?;
//!
//! sdk.blur_background("input/portrait.jpg", "output/portrait.jpg", &BlurOptions::default())
//!     .await?;
//!
//! let options = UpscaleOptions::default().with_scale_factor(4);
//! sdk.upscale_image("input/small.png", "output/large.png", &options)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): the `miragic` binary with progress bars and tracing setup
//! - `tracing-json`: JSON log output for the CLI
//! - `tracing-files`: log file output for the CLI
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! miragic-sdk = { version = "1.0", default-features = false }
//! ```
//!
//! ## Testing without the network
//!
//! ```rust
//! use miragic_sdk::{MiragicSdk, MockBackend, SdkConfig};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MockBackend::always_image(b"result".to_vec()));
//! let sdk = MiragicSdk::with_backend(SdkConfig::builder("test-key").build().unwrap(), backend);
//! ```

pub mod backends;
pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod options;
pub mod processor;
pub mod retry;
pub mod sdk;
pub mod services;
pub mod tracing_config;
pub mod utils;

// Public API exports
pub use backends::{
    ApiRequest, ApiResponse, FormPart, HttpBackend, HttpMethod, ImageApiBackend, MockBackend,
    RecordedRequest, TransportError,
};
pub use batch::{BatchProcessor, BatchProgress, BatchResult, FailedFile, ProcessedFile};
pub use config::{SdkConfig, SdkConfigBuilder};
pub use error::{MiragicError, Result};
pub use features::{BackgroundRemover, BlurBackground, FeatureClient, ImageUpscaler};
pub use options::{
    BlurOptions, BlurPreset, OperationOptions, RemoveBackgroundOptions, UpscaleMethod,
    UpscaleOptions,
};
pub use processor::{Operation, OperationProcessor};
pub use retry::{RetryConfig, RetryPolicy};
pub use sdk::MiragicSdk;
pub use services::{ImageIOService, ImageInput};
pub use utils::{NumericValidator, PathValidator};

#[cfg(feature = "cli")]
pub use tracing_config::init_cli_tracing;
pub use tracing_config::{TracingConfig, TracingFormat, TracingGuard, TracingOutput};

/// SDK version (same as [`MiragicSdk::get_version`])
#[must_use]
pub fn version() -> &'static str {
    MiragicSdk::get_version()
}
