//! Batch processing over many inputs
//!
//! Runs one feature client over a list of files sequentially. A failing
//! item is logged and recorded; it never aborts the rest of the batch.

use crate::error::{MiragicError, Result};
use crate::features::FeatureClient;
use crate::services::ImageInput;
use log::{error, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Successfully processed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Input that failed, with the rendered error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub processed: Vec<ProcessedFile>,
    pub failed: Vec<FailedFile>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchResult {
    /// Number of inputs attempted
    #[must_use]
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Progress notification sent after each item
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// 1-based position of the item
    pub position: usize,
    pub total: usize,
    pub input: &'a Path,
    /// `Ok(output)` or `Err(error)` for this item
    pub outcome: std::result::Result<&'a Path, &'a MiragicError>,
}

/// Runs an operation over many inputs into one output directory
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    output_dir: PathBuf,
}

impl BatchProcessor {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output path for an input, named by the client's suffix convention
    pub fn output_path_for<C: FeatureClient>(&self, client: &C, input: &Path) -> PathBuf {
        self.output_dir.join(client.output_file_name(input))
    }

    /// Process every input with `client`
    ///
    /// `on_progress` is called once per input, after it finished.
    ///
    /// # Errors
    /// - `Io` if the output directory cannot be created; per-item failures
    ///   are collected in [`BatchResult::failed`] instead
    pub async fn run<C, F>(
        &self,
        client: &C,
        inputs: &[PathBuf],
        options: &C::Options,
        mut on_progress: F,
    ) -> Result<BatchResult>
    where
        C: FeatureClient,
        F: FnMut(BatchProgress<'_>),
    {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            MiragicError::file_io_error("create output directory", &self.output_dir, &e)
        })?;

        let start = Instant::now();
        let total = inputs.len();
        let mut result = BatchResult::default();

        info!("Starting {} for {} file(s)", C::OPERATION, total);

        let mut claimed = HashSet::new();
        for (index, input) in inputs.iter().enumerate() {
            let preferred = self.output_path_for(client, input);
            let output = claim_output_path(&mut claimed, preferred, index);

            match client
                .process(ImageInput::from(input), &output, options)
                .await
            {
                Ok(written) => {
                    log::debug!("✅ {} -> {}", input.display(), written.display());
                    on_progress(BatchProgress {
                        position: index + 1,
                        total,
                        input,
                        outcome: Ok(&written),
                    });
                    result.processed.push(ProcessedFile {
                        input: input.clone(),
                        output: written,
                    });
                },
                Err(e) => {
                    error!("❌ Failed to process {}: {}", input.display(), e);
                    on_progress(BatchProgress {
                        position: index + 1,
                        total,
                        input,
                        outcome: Err(&e),
                    });
                    result.failed.push(FailedFile {
                        input: input.clone(),
                        error: e.to_string(),
                    });
                },
            }
        }

        result.elapsed = start.elapsed();

        if !result.failed.is_empty() {
            warn!(
                "Some files failed to process. Processed: {}, Failed: {}",
                result.processed.len(),
                result.failed.len()
            );
        }
        info!("📊 Batch processing summary:");
        info!("  ├─ Files processed: {}", result.processed.len());
        info!("  ├─ Files failed: {}", result.failed.len());
        info!("  └─ Total time: {:.2}s", result.elapsed.as_secs_f64());

        Ok(result)
    }
}

/// Reserve `preferred`, or a `_{n}`-suffixed variant if an earlier item
/// in the batch already owns it. Names are compared case-insensitively.
fn claim_output_path(claimed: &mut HashSet<String>, preferred: PathBuf, index: usize) -> PathBuf {
    let key = |path: &Path| path.to_string_lossy().to_lowercase();
    if claimed.insert(key(&preferred)) {
        return preferred;
    }

    let stem = preferred
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = preferred
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = index + 1;
    loop {
        let candidate = preferred.with_file_name(format!("{stem}_{n}{extension}"));
        if claimed.insert(key(&candidate)) {
            warn!(
                "Output name {} already used in this batch; writing {}",
                preferred.display(),
                candidate.display()
            );
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MockBackend;
    use crate::config::SdkConfig;
    use crate::features::ImageUpscaler;
    use crate::options::UpscaleOptions;
    use crate::processor::OperationProcessor;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.jpg");
        let missing = temp_dir.path().join("b.jpg");
        let third = temp_dir.path().join("c.png");
        std::fs::write(&first, b"a").unwrap();
        std::fs::write(&third, b"c").unwrap();

        let backend = Arc::new(MockBackend::always_image(b"out".to_vec()));
        let config = Arc::new(SdkConfig::builder("k").build().unwrap());
        let upscaler = ImageUpscaler::new(OperationProcessor::new(backend.clone(), config));

        let out_dir = temp_dir.path().join("out");
        let batch = BatchProcessor::new(&out_dir);
        let mut seen = Vec::new();
        let result = batch
            .run(
                &upscaler,
                &[first.clone(), missing.clone(), third.clone()],
                &UpscaleOptions::default(),
                |progress| seen.push((progress.position, progress.outcome.is_ok())),
            )
            .await
            .unwrap();

        assert_eq!(result.total(), 3);
        assert_eq!(result.processed.len(), 2);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].input, missing);
        assert!(result.failed[0].error.contains("not found"));
        assert!(!result.is_complete_success());

        assert_eq!(seen, vec![(1, true), (2, false), (3, true)]);
        assert_eq!(backend.call_count(), 2);

        assert!(out_dir.join("a_upscaled.jpg").exists());
        assert!(out_dir.join("c_upscaled.png").exists());
    }

    #[test]
    fn test_claim_output_path_disambiguates() {
        let mut claimed = HashSet::new();
        let mut claim = |name: &str, index| {
            claim_output_path(&mut claimed, PathBuf::from(name), index)
        };
        let first = claim("out/photo_no_bg.png", 0);
        let second = claim("out/photo_no_bg.png", 1);
        let third = claim("out/Photo_no_bg.PNG", 2);
        let taken = claim("out/photo_no_bg_2.png", 3);

        assert_eq!(first, PathBuf::from("out/photo_no_bg.png"));
        assert_eq!(second, PathBuf::from("out/photo_no_bg_2.png"));
        assert_eq!(third, PathBuf::from("out/Photo_no_bg_3.PNG"));
        assert_eq!(taken, PathBuf::from("out/photo_no_bg_2_4.png"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Arc::new(MockBackend::new());
        let config = Arc::new(SdkConfig::builder("k").build().unwrap());
        let upscaler = ImageUpscaler::new(OperationProcessor::new(backend, config));

        let result = BatchProcessor::new(temp_dir.path().join("out"))
            .run(&upscaler, &[], &UpscaleOptions::default(), |_| {})
            .await
            .unwrap();

        assert_eq!(result.total(), 0);
        assert!(result.is_complete_success());
        assert!(temp_dir.path().join("out").is_dir());
    }
}
