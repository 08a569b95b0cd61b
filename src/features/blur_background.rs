//! Background blur client

use super::FeatureClient;
use crate::error::Result;
use crate::options::BlurOptions;
use crate::processor::{Operation, OperationProcessor};
use crate::services::ImageInput;
use std::path::{Path, PathBuf};

/// Blurs the background of an image while keeping the subject sharp
#[derive(Debug, Clone)]
pub struct BlurBackground {
    processor: OperationProcessor,
}

impl BlurBackground {
    #[must_use]
    pub fn new(processor: OperationProcessor) -> Self {
        Self { processor }
    }

    /// Blur the background of `input` and save the result to `output`
    ///
    /// # Errors
    /// - `InvalidOption` if `blur_strength` is outside 0.0-1.0
    /// - `InputNotFound`, `UnsupportedFormat`, `RemoteService` or `Io`
    pub async fn apply_blur<I, P>(
        &self,
        input: I,
        output: P,
        options: &BlurOptions,
    ) -> Result<PathBuf>
    where
        I: Into<ImageInput> + Send,
        P: AsRef<Path> + Send,
    {
        self.process(input.into(), output.as_ref(), options).await
    }
}

impl FeatureClient for BlurBackground {
    type Options = BlurOptions;

    const OPERATION: Operation = Operation::BlurBackground;
    const OUTPUT_SUFFIX: &'static str = "blurred";

    fn processor(&self) -> &OperationProcessor {
        &self.processor
    }
}
