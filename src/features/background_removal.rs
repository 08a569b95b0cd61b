//! Background removal client

use super::FeatureClient;
use crate::error::Result;
use crate::options::RemoveBackgroundOptions;
use crate::processor::{Operation, OperationProcessor};
use crate::services::ImageInput;
use std::path::{Path, PathBuf};

/// Removes the background of an image through the remote API
#[derive(Debug, Clone)]
pub struct BackgroundRemover {
    processor: OperationProcessor,
}

impl BackgroundRemover {
    #[must_use]
    pub fn new(processor: OperationProcessor) -> Self {
        Self { processor }
    }

    /// Remove the background of `input` and save the cut-out to `output`
    ///
    /// # Errors
    /// - `InvalidOption` if `threshold` is outside 0-255
    /// - `InputNotFound`, `UnsupportedFormat`, `RemoteService` or `Io` as for
    ///   every operation
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
        self.process(input.into(), output.as_ref(), options).await
    }
}

impl FeatureClient for BackgroundRemover {
    type Options = RemoveBackgroundOptions;

    const OPERATION: Operation = Operation::RemoveBackground;
    const OUTPUT_SUFFIX: &'static str = "no_bg";

    fn processor(&self) -> &OperationProcessor {
        &self.processor
    }

    /// Cut-outs keep transparency, so outputs are always PNG
    fn output_file_name(&self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        format!("{}_{}.png", stem, Self::OUTPUT_SUFFIX)
    }
}
