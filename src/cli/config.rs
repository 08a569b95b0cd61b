//! Conversion of CLI arguments into option sets

use crate::cli::main_impl::{BlurArgs, RemoveBgArgs, UpscaleArgs};
use crate::options::{BlurOptions, OperationOptions, RemoveBackgroundOptions, UpscaleOptions};
use crate::SdkConfig;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Builds operation options from CLI arguments, falling back to the
/// configured defaults for anything not given on the command line
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    pub(crate) fn remove_background(
        args: &RemoveBgArgs,
        config: &SdkConfig,
    ) -> Result<RemoveBackgroundOptions> {
        let mut options = config
            .remove_background_options()
            .with_edge_refinement(args.edge_refinement)
            .with_hair_detection(args.hair_detection);
        if let Some(threshold) = args.threshold {
            options.threshold = threshold;
        }
        options
            .validate()
            .context("Invalid background removal options")?;
        Ok(options)
    }

    pub(crate) fn upscale(args: &UpscaleArgs, config: &SdkConfig) -> Result<UpscaleOptions> {
        let mut options = config
            .upscale_options()
            .with_method(args.method)
            .with_sharpen(args.sharpen)
            .with_noise_reduction(args.noise_reduction);
        if let Some(scale) = args.scale {
            options.scale_factor = scale;
        }
        options.validate().context("Invalid upscale options")?;
        Ok(options)
    }

    /// A preset sets both values; explicit flags override it
    pub(crate) fn blur(args: &BlurArgs, config: &SdkConfig) -> Result<BlurOptions> {
        let mut options = match args.preset {
            Some(preset) => BlurOptions::from(preset),
            None => config.blur_options(),
        };
        if let Some(strength) = args.strength {
            options.blur_strength = strength;
        }
        if args.center_focus {
            options.center_focus = true;
        }
        options.validate().context("Invalid blur options")?;
        Ok(options)
    }

    /// Parse a JSON option object, rejecting unknown keys
    pub(crate) fn from_json<O>(json: Option<&str>) -> Result<O>
    where
        O: OperationOptions + DeserializeOwned + Default,
    {
        let options = match json {
            Some(raw) => serde_json::from_str::<O>(raw).context("Invalid --options JSON")?,
            None => O::default(),
        };
        options.validate().context("Invalid batch options")?;
        Ok(options)
    }
}
