//! Per-operation option sets
//!
//! Each remote operation takes one typed option struct. Values are checked
//! client-side before any request is built, and the structs deserialize with
//! `deny_unknown_fields` so option maps coming from JSON cannot smuggle in
//! keys the API does not know about.

use crate::config::{DEFAULT_BLUR_STRENGTH, DEFAULT_SCALE_FACTOR, DEFAULT_THRESHOLD};
use crate::error::{MiragicError, Result};
use crate::utils::NumericValidator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Valid threshold range for background removal
pub const THRESHOLD_RANGE: (i32, i32) = (0, 255);
/// Valid scale factor range for upscaling
pub const SCALE_FACTOR_RANGE: (u32, u32) = (1, 8);

/// Common behaviour of operation option sets
pub trait OperationOptions {
    /// Check every value against its valid range
    ///
    /// # Errors
    /// - `MiragicError::InvalidOption` naming the first offending option
    fn validate(&self) -> Result<()>;

    /// Option values as multipart text fields, in a stable order
    fn form_fields(&self) -> Vec<(&'static str, String)>;
}

/// Options for background removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RemoveBackgroundOptions {
    /// Foreground/background separation threshold (0-255)
    pub threshold: i32,
    /// Refine mask edges
    pub edge_refinement: bool,
    /// Special handling for hair and fine structures
    pub hair_detection: bool,
}

impl Default for RemoveBackgroundOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            edge_refinement: false,
            hair_detection: false,
        }
    }
}

impl RemoveBackgroundOptions {
    #[must_use]
    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_edge_refinement(mut self, enabled: bool) -> Self {
        self.edge_refinement = enabled;
        self
    }

    #[must_use]
    pub fn with_hair_detection(mut self, enabled: bool) -> Self {
        self.hair_detection = enabled;
        self
    }
}

impl OperationOptions for RemoveBackgroundOptions {
    fn validate(&self) -> Result<()> {
        NumericValidator::validate_range("threshold", self.threshold, THRESHOLD_RANGE)?;
        Ok(())
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("threshold", self.threshold.to_string()),
            ("edge_refinement", self.edge_refinement.to_string()),
            ("hair_detection", self.hair_detection.to_string()),
        ]
    }
}

/// Options for background blur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BlurOptions {
    /// Blur strength (0.0 to 1.0)
    pub blur_strength: f32,
    /// Keep the image center sharp
    pub center_focus: bool,
}

impl Default for BlurOptions {
    fn default() -> Self {
        Self {
            blur_strength: DEFAULT_BLUR_STRENGTH,
            center_focus: false,
        }
    }
}

impl BlurOptions {
    #[must_use]
    pub fn with_strength(mut self, blur_strength: f32) -> Self {
        self.blur_strength = blur_strength;
        self
    }

    #[must_use]
    pub fn with_center_focus(mut self, enabled: bool) -> Self {
        self.center_focus = enabled;
        self
    }
}

impl From<BlurPreset> for BlurOptions {
    fn from(preset: BlurPreset) -> Self {
        match preset {
            BlurPreset::Portrait => Self {
                blur_strength: 0.8,
                center_focus: true,
            },
            BlurPreset::Product => Self {
                blur_strength: 0.7,
                center_focus: true,
            },
            BlurPreset::Artistic => Self {
                blur_strength: 0.9,
                center_focus: false,
            },
        }
    }
}

impl OperationOptions for BlurOptions {
    fn validate(&self) -> Result<()> {
        NumericValidator::validate_unit_interval("blur_strength", self.blur_strength)?;
        Ok(())
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("blur_strength", self.blur_strength.to_string()),
            ("center_focus", self.center_focus.to_string()),
        ]
    }
}

/// Named blur settings for common photo types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum BlurPreset {
    /// Strong blur, subject centered
    Portrait,
    /// Moderate blur, subject centered
    Product,
    /// Very strong blur over the whole frame
    Artistic,
}

/// Resampling method requested from the upscaler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum UpscaleMethod {
    /// Lanczos resampling (highest quality)
    #[default]
    Lanczos,
    /// Bicubic interpolation
    Bicubic,
    /// Nearest neighbour (pixel art)
    Nearest,
}

impl UpscaleMethod {
    /// Wire name of the method
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lanczos => "lanczos",
            Self::Bicubic => "bicubic",
            Self::Nearest => "nearest",
        }
    }

    /// All methods, in the order the API documents them
    #[must_use]
    pub fn all() -> &'static [UpscaleMethod] {
        &[Self::Lanczos, Self::Bicubic, Self::Nearest]
    }
}

impl fmt::Display for UpscaleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpscaleMethod {
    type Err = MiragicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lanczos" => Ok(Self::Lanczos),
            "bicubic" => Ok(Self::Bicubic),
            "nearest" => Ok(Self::Nearest),
            other => Err(MiragicError::invalid_option(format!(
                "Unknown upscale method '{}' (expected lanczos, bicubic or nearest)",
                other
            ))),
        }
    }
}

/// Options for upscaling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UpscaleOptions {
    /// Integer scale factor (1-8)
    pub scale_factor: u32,
    /// Resampling method
    pub method: UpscaleMethod,
    /// Sharpen after upscaling
    pub sharpen: bool,
    /// Denoise before upscaling
    pub noise_reduction: bool,
}

impl Default for UpscaleOptions {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            method: UpscaleMethod::default(),
            sharpen: false,
            noise_reduction: false,
        }
    }
}

impl UpscaleOptions {
    #[must_use]
    pub fn with_scale_factor(mut self, scale_factor: u32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: UpscaleMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_sharpen(mut self, enabled: bool) -> Self {
        self.sharpen = enabled;
        self
    }

    #[must_use]
    pub fn with_noise_reduction(mut self, enabled: bool) -> Self {
        self.noise_reduction = enabled;
        self
    }
}

impl OperationOptions for UpscaleOptions {
    fn validate(&self) -> Result<()> {
        NumericValidator::validate_range("scale_factor", self.scale_factor, SCALE_FACTOR_RANGE)?;
        Ok(())
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("scale_factor", self.scale_factor.to_string()),
            ("method", self.method.to_string()),
            ("sharpen", self.sharpen.to_string()),
            ("noise_reduction", self.noise_reduction.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        assert_eq!(RemoveBackgroundOptions::default().threshold, 128);
        assert_eq!(UpscaleOptions::default().scale_factor, 2);
        assert_eq!(UpscaleOptions::default().method, UpscaleMethod::Lanczos);
        assert!((BlurOptions::default().blur_strength - 0.8).abs() < f32::EPSILON);
        assert!(!BlurOptions::default().center_focus);
    }

    #[test]
    fn test_threshold_bounds() {
        for threshold in [0, 1, 128, 254, 255] {
            let options = RemoveBackgroundOptions::default().with_threshold(threshold);
            assert!(options.validate().is_ok(), "threshold {threshold}");
        }
        for threshold in [-1, 256, -255, 1000, i32::MIN, i32::MAX] {
            let options = RemoveBackgroundOptions::default().with_threshold(threshold);
            assert!(
                matches!(options.validate(), Err(MiragicError::InvalidOption(_))),
                "threshold {threshold}"
            );
        }
    }

    #[test]
    fn test_blur_strength_bounds() {
        for strength in [0.0, 0.25, 0.8, 1.0] {
            let options = BlurOptions::default().with_strength(strength);
            assert!(options.validate().is_ok());
        }
        for strength in [-0.01, 1.01, 2.0, f32::NAN, f32::INFINITY] {
            let err = BlurOptions::default()
                .with_strength(strength)
                .validate()
                .unwrap_err();
            assert!(matches!(err, MiragicError::InvalidOption(_)));
            assert!(err.to_string().contains("blur_strength"));
        }
    }

    #[test]
    fn test_scale_factor_bounds() {
        for factor in 1..=8 {
            assert!(UpscaleOptions::default()
                .with_scale_factor(factor)
                .validate()
                .is_ok());
        }
        for factor in [0, 9, 16, u32::MAX] {
            assert!(matches!(
                UpscaleOptions::default()
                    .with_scale_factor(factor)
                    .validate(),
                Err(MiragicError::InvalidOption(_))
            ));
        }
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let parsed: std::result::Result<RemoveBackgroundOptions, _> =
            serde_json::from_str(r#"{"threshold": 150, "magic": true}"#);
        assert!(parsed.is_err());

        let parsed: std::result::Result<UpscaleOptions, _> =
            serde_json::from_str(r#"{"scale_factor": 3, "method": "bicubic", "turbo": 1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let parsed: UpscaleOptions =
            serde_json::from_str(r#"{"method": "nearest", "sharpen": true}"#)
                .unwrap();
        assert_eq!(parsed.scale_factor, 2);
        assert_eq!(parsed.method, UpscaleMethod::Nearest);
        assert!(parsed.sharpen);

        let parsed: BlurOptions = serde_json::from_str(r#"{"center_focus": true}"#).unwrap();
        assert!(parsed.center_focus);
        assert!((parsed.blur_strength - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_upscale_method_parsing() {
        assert_eq!("LANCZOS".parse::<UpscaleMethod>().unwrap(), UpscaleMethod::Lanczos);
        assert_eq!("bicubic".parse::<UpscaleMethod>().unwrap(), UpscaleMethod::Bicubic);
        assert!("bilinear".parse::<UpscaleMethod>().is_err());
        assert_eq!(UpscaleMethod::Nearest.to_string(), "nearest");
        assert_eq!(UpscaleMethod::all().len(), 3);
    }

    #[test]
    fn test_blur_presets() {
        let portrait = BlurOptions::from(BlurPreset::Portrait);
        assert!(portrait.center_focus);
        assert!((portrait.blur_strength - 0.8).abs() < f32::EPSILON);

        let artistic = BlurOptions::from(BlurPreset::Artistic);
        assert!(!artistic.center_focus);
        assert!(artistic.validate().is_ok());
    }

    #[test]
    fn test_form_fields() {
        let fields = UpscaleOptions::default()
            .with_scale_factor(4)
            .with_method(UpscaleMethod::Bicubic)
            .with_sharpen(true)
            .form_fields();
        assert_eq!(
            fields,
            vec![
                ("scale_factor", "4".to_string()),
                ("method", "bicubic".to_string()),
                ("sharpen", "true".to_string()),
                ("noise_reduction", "false".to_string()),
            ]
        );

        let fields = RemoveBackgroundOptions::default().form_fields();
        assert_eq!(fields.first(), Some(&("threshold", "128".to_string())));
    }
}
