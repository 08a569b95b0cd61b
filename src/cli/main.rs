//! Miragic CLI
//!
//! Command-line front end for the image-processing API. Configuration comes
//! from the environment; see `SdkConfig::from_env`.

use super::config::CliConfigBuilder;
use crate::{
    batch::{BatchProcessor, BatchProgress, BatchResult},
    features::FeatureClient,
    options::{BlurOptions, BlurPreset, RemoveBackgroundOptions, UpscaleMethod, UpscaleOptions},
    MiragicSdk, SdkConfig,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Miragic image-processing CLI
#[derive(Parser, Debug)]
#[command(name = "miragic", author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove the background of an image
    #[command(name = "remove-bg")]
    RemoveBg {
        /// Input image
        input: PathBuf,
        /// Output image (PNG keeps transparency)
        output: PathBuf,
        #[command(flatten)]
        args: RemoveBgArgs,
    },

    /// Upscale an image
    Upscale {
        /// Input image
        input: PathBuf,
        /// Output image
        output: PathBuf,
        #[command(flatten)]
        args: UpscaleArgs,
    },

    /// Blur the background of an image
    #[command(name = "blur-bg")]
    BlurBg {
        /// Input image
        input: PathBuf,
        /// Output image
        output: PathBuf,
        #[command(flatten)]
        args: BlurArgs,
    },

    /// Run one operation over many images
    Batch(BatchArgs),

    /// Show API service status
    Status,

    /// Show account usage statistics
    Usage,
}

#[derive(Args, Debug, Default)]
pub struct RemoveBgArgs {
    /// Foreground threshold (0-255) [default: from configuration, 128]
    #[arg(long)]
    pub threshold: Option<i32>,

    /// Refine mask edges
    #[arg(long)]
    pub edge_refinement: bool,

    /// Preserve hair and other fine detail
    #[arg(long)]
    pub hair_detection: bool,
}

#[derive(Args, Debug, Default)]
pub struct UpscaleArgs {
    /// Scale factor (1-8) [default: from configuration, 2]
    #[arg(long)]
    pub scale: Option<u32>,

    /// Resampling method
    #[arg(long, value_enum, default_value_t = UpscaleMethod::Lanczos)]
    pub method: UpscaleMethod,

    /// Sharpen the result
    #[arg(long)]
    pub sharpen: bool,

    /// Reduce noise before upscaling
    #[arg(long)]
    pub noise_reduction: bool,
}

#[derive(Args, Debug, Default)]
pub struct BlurArgs {
    /// Blur strength (0.0-1.0) [default: from preset or configuration, 0.8]
    #[arg(long)]
    pub strength: Option<f32>,

    /// Keep the image center sharp
    #[arg(long)]
    pub center_focus: bool,

    /// Named blur settings
    #[arg(long, value_enum)]
    pub preset: Option<BlurPreset>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Operation to run
    #[arg(value_enum)]
    pub operation: BatchOperation,

    /// Input files or directories
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Directory for the results [default: configured output directory]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// File name pattern for directory inputs (e.g. "*.jpg")
    #[arg(long)]
    pub pattern: Option<String>,

    /// Operation options as a JSON object, e.g. '{"scale_factor": 4}'
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BatchOperation {
    #[value(name = "remove-bg")]
    RemoveBg,
    Upscale,
    #[value(name = "blur-bg")]
    BlurBg,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _tracing_guard = crate::tracing_config::init_cli_tracing(cli.verbose)
        .context("Failed to initialize tracing")?;

    let config = SdkConfig::from_env()
        .context("Failed to load configuration")?;
    config
        .setup_directories()
        .context("Failed to set up input/output directories")?;
    if !config.validate() {
        warn!("Configuration check reported problems; continuing");
    }

    info!(
        "Using {} (key {})",
        config.api_base_url,
        config.api_key_hint()
    );

    let sdk = MiragicSdk::new(config.clone())
        .context("Failed to create Miragic client")?;
    let start_time = Instant::now();

    match &cli.command {
        Command::RemoveBg {
            input,
            output,
            args,
        } => {
            let options = CliConfigBuilder::remove_background(args, &config)?;
            let written = sdk
                .remove_background(input, output, &options)
                .await
                .with_context(|| format!("Background removal failed for {}", input.display()))?;
            println!("✅ Background removed: {}", written.display());
        },
        Command::Upscale {
            input,
            output,
            args,
        } => {
            let options = CliConfigBuilder::upscale(args, &config)?;
            let written = sdk
                .upscale_image(input, output, &options)
                .await
                .with_context(|| format!("Upscaling failed for {}", input.display()))?;
            println!(
                "✅ Image upscaled {}x: {}",
                options.scale_factor,
                written.display()
            );
        },
        Command::BlurBg {
            input,
            output,
            args,
        } => {
            let options = CliConfigBuilder::blur(args, &config)?;
            let written = sdk
                .blur_background(input, output, &options)
                .await
                .with_context(|| format!("Background blur failed for {}", input.display()))?;
            println!("✅ Background blurred: {}", written.display());
        },
        Command::Batch(args) => {
            let result = run_batch(&sdk, &config, args).await?;
            if !result.failed.is_empty() {
                anyhow::bail!(
                    "{} of {} file(s) failed",
                    result.failed.len(),
                    result.total()
                );
            }
        },
        Command::Status => {
            let status = sdk
                .get_api_status()
                .await
                .context("Failed to fetch API status")?;
            println!("📡 API status:");
            print_key_values(&status);
        },
        Command::Usage => {
            let usage = sdk
                .get_usage_stats()
                .await
                .context("Failed to fetch usage statistics")?;
            println!("📊 Usage statistics:");
            print_key_values(&usage);
        },
    }

    info!("Done in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

async fn run_batch(sdk: &MiragicSdk, config: &SdkConfig, args: &BatchArgs) -> Result<BatchResult> {
    let files = collect_inputs(&args.inputs, args.recursive, args.pattern.as_deref(), config)?;
    if files.is_empty() {
        warn!("No supported image files found in the provided inputs");
        return Ok(BatchResult::default());
    }
    info!("Found {} image file(s) to process", files.len());

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    if output_dir.is_file() {
        anyhow::bail!(
            "Output path exists and is a file, not a directory: {}",
            output_dir.display()
        );
    }
    let batch = BatchProcessor::new(output_dir);
    let json = args.options.as_deref();

    let result = match args.operation {
        BatchOperation::RemoveBg => {
            let options: RemoveBackgroundOptions = CliConfigBuilder::from_json(json)?;
            run_with_progress(&batch, sdk.background_remover(), &files, &options)
                .await?
        },
        BatchOperation::Upscale => {
            let options: UpscaleOptions = CliConfigBuilder::from_json(json)?;
            run_with_progress(&batch, sdk.image_upscaler(), &files, &options)
                .await?
        },
        BatchOperation::BlurBg => {
            let options: BlurOptions = CliConfigBuilder::from_json(json)?;
            run_with_progress(&batch, sdk.blur(), &files, &options)
                .await?
        },
    };

    for failed in &result.failed {
        eprintln!("❌ {}: {}", failed.input.display(), failed.error);
    }
    println!(
        "Completed! Processed: {}, Failed: {} ({:.2}s)",
        result.processed.len(),
        result.failed.len(),
        result.elapsed.as_secs_f64()
    );

    Ok(result)
}

async fn run_with_progress<C: FeatureClient>(
    batch: &BatchProcessor,
    client: &C,
    files: &[PathBuf],
    options: &C::Options,
) -> Result<BatchResult> {
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let result = batch
        .run(client, files, options, |update: BatchProgress<'_>| {
            let name = update
                .input
                .file_name()
                .map_or_else(
                    || update.input.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
            match update.outcome {
                Ok(_) => progress.set_message(format!("✅ {}", name)),
                Err(_) => progress.set_message(format!("❌ {}", name)),
            }
            progress.inc(1);
        })
        .await
        .context("Batch processing failed")?;

    progress.finish_and_clear();
    Ok(result)
}

/// Expand files and directories into a sorted list of image paths
///
/// Paths that do not exist are kept so they are reported as failures.
fn collect_inputs(
    inputs: &[PathBuf],
    recursive: bool,
    pattern: Option<&str>,
    config: &SdkConfig,
) -> Result<Vec<PathBuf>> {
    let pattern = pattern
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid --pattern")?;
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in walkdir::WalkDir::new(input).max_depth(max_depth) {
                let entry = entry
                    .with_context(|| format!("Failed to read directory {}", input.display()))?;
                let path = entry.path();
                if entry.file_type().is_file()
                    && config.is_supported_format(path)
                    && matches_pattern(path, pattern.as_ref())
                {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            files.push(input.clone());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn matches_pattern(path: &Path, pattern: Option<&glob::Pattern>) -> bool {
    match pattern {
        Some(pattern) => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| pattern.matches(name)),
        None => true,
    }
}

fn print_key_values(value: &serde_json::Value) {
    match value.as_object() {
        Some(map) => {
            for (key, value) in map {
                match value {
                    serde_json::Value::String(s) => println!("  {}: {}", key, s),
                    other => println!("  {}: {}", key, other),
                }
            }
        },
        None => println!("  {}", value),
    }
}
