//! Feature clients, one per remote operation
//!
//! Each client pairs an [`Operation`] with its option type and shares the
//! request pipeline in [`OperationProcessor`].

pub mod background_removal;
pub mod blur_background;
pub mod image_upscaler;

pub use background_removal::BackgroundRemover;
pub use blur_background::BlurBackground;
pub use image_upscaler::ImageUpscaler;

use crate::error::Result;
use crate::options::OperationOptions;
use crate::processor::{Operation, OperationProcessor};
use crate::services::ImageInput;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Client for one remote image operation
#[async_trait]
pub trait FeatureClient: Send + Sync {
    /// Option set accepted by the operation
    type Options: OperationOptions + Default + Clone + Send + Sync;

    /// Remote operation performed by this client
    const OPERATION: Operation;

    /// Suffix appended to the input stem when naming batch outputs
    const OUTPUT_SUFFIX: &'static str;

    /// Shared request pipeline
    fn processor(&self) -> &OperationProcessor;

    /// Output file name derived from an input path, e.g. `cat.jpg` ->
    /// `cat_blurred.jpg`
    fn output_file_name(&self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let extension = input
            .extension()
            .and_then(|s| s.to_str())
            .map_or_else(|| "png".to_string(), str::to_lowercase);
        format!("{}_{}.{}", stem, Self::OUTPUT_SUFFIX, extension)
    }

    /// Run the operation on `input` and write the result to `output`
    ///
    /// Returns the output path on success.
    ///
    /// # Errors
    /// - See [`OperationProcessor::execute`]
    async fn process(
        &self,
        input: ImageInput,
        output: &Path,
        options: &Self::Options,
    ) -> Result<PathBuf> {
        self.processor()
            .execute(Self::OPERATION, &input, output, options)
            .await
    }
}
