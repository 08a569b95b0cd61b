//! Image upscaling client

use super::FeatureClient;
use crate::error::Result;
use crate::options::UpscaleOptions;
use crate::processor::{Operation, OperationProcessor};
use crate::services::ImageInput;
use std::path::{Path, PathBuf};

/// Enlarges images through the remote API
#[derive(Debug, Clone)]
pub struct ImageUpscaler {
    processor: OperationProcessor,
}

impl ImageUpscaler {
    #[must_use]
    pub fn new(processor: OperationProcessor) -> Self {
        Self { processor }
    }

    /// Upscale `input` and save the result to `output`
    ///
    /// # Errors
    /// - `InvalidOption` if `scale_factor` is outside 1-8
    /// - `InputNotFound`, `UnsupportedFormat`, `RemoteService` or `Io`
    pub async fn upscale<I, P>(
        &self,
        input: I,
        output: P,
        options: &UpscaleOptions,
    ) -> Result<PathBuf>
    where
        I: Into<ImageInput> + Send,
        P: AsRef<Path> + Send,
    {
        self.process(input.into(), output.as_ref(), options).await
    }
}

impl FeatureClient for ImageUpscaler {
    type Options = UpscaleOptions;

    const OPERATION: Operation = Operation::Upscale;
    const OUTPUT_SUFFIX: &'static str = "upscaled";

    fn processor(&self) -> &OperationProcessor {
        &self.processor
    }
}
