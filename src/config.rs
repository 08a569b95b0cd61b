//! Configuration for the Miragic SDK
//!
//! `SdkConfig` is resolved once at startup, either from the environment
//! (`SdkConfig::from_env`) or programmatically (`SdkConfig::builder`), and is
//! then passed by value to the façade. Nothing here is process-global.

use crate::error::{MiragicError, Result};
use crate::options::{BlurOptions, RemoveBackgroundOptions, UpscaleOptions};
use crate::utils::PathValidator;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API key (required)
pub const ENV_API_KEY: &str = "MIRAGIC_API_KEY";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE_URL: &str = "MIRAGIC_API_BASE_URL";
/// Environment variable overriding the request timeout in seconds
pub const ENV_API_TIMEOUT: &str = "MIRAGIC_API_TIMEOUT";
/// Environment variable enabling retries for remote failures
pub const ENV_API_MAX_RETRIES: &str = "MIRAGIC_API_MAX_RETRIES";

/// Default base URL of the image-processing API
pub const DEFAULT_API_BASE_URL: &str = "https://api.miragic.com/v1";
/// Default request timeout in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
/// Default blur strength for background blur
pub const DEFAULT_BLUR_STRENGTH: f32 = 0.8;
/// Default upscaling factor
pub const DEFAULT_SCALE_FACTOR: u32 = 2;
/// Default background removal threshold
pub const DEFAULT_THRESHOLD: i32 = 128;

/// Image extensions accepted for input and output (lowercase, without dot)
pub const DEFAULT_SUPPORTED_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// Resolved SDK configuration
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// API key sent with every request
    api_key: SecretString,

    /// Base URL of the API, without trailing slash
    pub api_base_url: String,

    /// Per-request timeout in seconds
    pub api_timeout: u64,

    /// Retries for retryable remote failures (0 = never retry)
    pub max_retries: u32,

    /// Blur strength for [`SdkConfig::blur_options`] and the CLI
    pub default_blur_strength: f32,

    /// Scale factor for [`SdkConfig::upscale_options`] and the CLI
    pub default_scale_factor: u32,

    /// Threshold for [`SdkConfig::remove_background_options`] and the CLI
    pub default_threshold: i32,

    /// Directory where the CLI and demos expect inputs
    pub input_dir: PathBuf,

    /// Directory where the CLI and demos write outputs
    pub output_dir: PathBuf,

    /// Accepted image extensions (lowercase, without dot)
    pub supported_formats: Vec<String>,
}

impl SdkConfig {
    /// Create a configuration builder for the given API key
    ///
    /// # Examples
    /// ```rust
    /// use miragic_sdk::SdkConfig;
    ///
    /// let config = SdkConfig::builder("my-key")
    ///     .api_base_url("https://images.example.com/v1")
    ///     .api_timeout(60)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.api_timeout, 60);
    /// ```
    pub fn builder<S: Into<String>>(api_key: S) -> SdkConfigBuilder {
        SdkConfigBuilder::new(api_key)
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    /// - `MIRAGIC_API_KEY` is unset or empty
    /// - `MIRAGIC_API_TIMEOUT` or `MIRAGIC_API_MAX_RETRIES` is not an integer
    /// - `MIRAGIC_API_BASE_URL` is not a valid URL
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// `lookup` is called with the variable name and returns its value, if any.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                MiragicError::configuration(format!(
                    "API key not found. Set the {} environment variable.",
                    ENV_API_KEY
                ))
            })?;

        let mut builder = SdkConfigBuilder::new(api_key);

        if let Some(base_url) = lookup(ENV_API_BASE_URL) {
            builder = builder.api_base_url(base_url);
        }

        if let Some(timeout) = lookup(ENV_API_TIMEOUT) {
            let secs = timeout.trim().parse::<u64>().map_err(|_| {
                MiragicError::configuration(format!(
                    "{} must be an integer number of seconds, got '{}'",
                    ENV_API_TIMEOUT, timeout
                ))
            })?;
            builder = builder.api_timeout(secs);
        }

        if let Some(retries) = lookup(ENV_API_MAX_RETRIES) {
            let count = retries.trim().parse::<u32>().map_err(|_| {
                MiragicError::configuration(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_API_MAX_RETRIES, retries
                ))
            })?;
            builder = builder.max_retries(count);
        }

        builder.build()
    }

    /// The API key (exposing the secret)
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Last four characters of the API key, for diagnostics
    #[must_use]
    pub fn api_key_hint(&self) -> String {
        let key = self.api_key.expose_secret();
        let tail: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout)
    }

    /// Non-fatal configuration check
    ///
    /// Logs the problem and returns `false` when the API key is empty or the
    /// input directory does not exist.
    #[must_use]
    pub fn validate(&self) -> bool {
        if self.api_key.expose_secret().trim().is_empty() {
            log::error!(
                "API key not found. Set {} environment variable.",
                ENV_API_KEY
            );
            return false;
        }

        if !self.input_dir.exists() {
            log::warn!(
                "Input directory '{}' does not exist.",
                self.input_dir.display()
            );
            return false;
        }

        true
    }

    /// Create the input and output directories if they are missing
    ///
    /// # Errors
    /// - Directory creation fails (permissions, path is a file, ...)
    pub fn setup_directories(&self) -> Result<()> {
        for dir in [&self.input_dir, &self.output_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| MiragicError::file_io_error("create directory", dir, &e))?;
        }
        Ok(())
    }

    /// Check whether a path carries one of the supported image extensions
    pub fn is_supported_format<P: AsRef<Path>>(&self, path: P) -> bool {
        PathValidator::has_extension(path, &self.supported_formats)
    }

    /// Background removal options seeded with `default_threshold`
    #[must_use]
    pub fn remove_background_options(&self) -> RemoveBackgroundOptions {
        RemoveBackgroundOptions::default()
            .with_threshold(self.default_threshold)
    }

    /// Upscale options seeded with `default_scale_factor`
    #[must_use]
    pub fn upscale_options(&self) -> UpscaleOptions {
        UpscaleOptions::default()
            .with_scale_factor(self.default_scale_factor)
    }

    /// Blur options seeded with `default_blur_strength`
    #[must_use]
    pub fn blur_options(&self) -> BlurOptions {
        BlurOptions::default()
            .with_strength(self.default_blur_strength)
    }
}

/// Builder for `SdkConfig`
#[derive(Debug)]
pub struct SdkConfigBuilder {
    api_key: String,
    api_base_url: String,
    api_timeout: u64,
    max_retries: u32,
    default_blur_strength: f32,
    default_scale_factor: u32,
    default_threshold: i32,
    input_dir: PathBuf,
    output_dir: PathBuf,
    supported_formats: Vec<String>,
}

impl SdkConfigBuilder {
    #[must_use]
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT_SECS,
            max_retries: 0,
            default_blur_strength: DEFAULT_BLUR_STRENGTH,
            default_scale_factor: DEFAULT_SCALE_FACTOR,
            default_threshold: DEFAULT_THRESHOLD,
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            supported_formats: DEFAULT_SUPPORTED_FORMATS
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn api_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn api_timeout(mut self, secs: u64) -> Self {
        self.api_timeout = secs;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn default_blur_strength(mut self, strength: f32) -> Self {
        self.default_blur_strength = strength;
        self
    }

    #[must_use]
    pub fn default_scale_factor(mut self, factor: u32) -> Self {
        self.default_scale_factor = factor;
        self
    }

    #[must_use]
    pub fn default_threshold(mut self, threshold: i32) -> Self {
        self.default_threshold = threshold;
        self
    }

    #[must_use]
    pub fn input_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.input_dir = dir.into();
        self
    }

    #[must_use]
    pub fn output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the accepted extensions; leading dots and case are normalized
    #[must_use]
    pub fn supported_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_formats = formats
            .into_iter()
            .map(|f| f.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    /// - Empty API key
    /// - Base URL that does not parse as an http(s) URL
    /// - Zero timeout
    /// - Default option values outside their valid ranges
    pub fn build(self) -> Result<SdkConfig> {
        if self.api_key.trim().is_empty() {
            return Err(MiragicError::configuration("API key cannot be empty"));
        }

        let api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&api_base_url).map_err(|e| {
            MiragicError::configuration(format!("Invalid API base URL '{}': {}", api_base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MiragicError::configuration(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.api_timeout == 0 {
            return Err(MiragicError::configuration(
                "API timeout must be at least 1 second",
            ));
        }

        if !(0.0..=1.0).contains(&self.default_blur_strength) {
            return Err(MiragicError::configuration(format!(
                "Default blur strength must be between 0.0 and 1.0, got {}",
                self.default_blur_strength
            )));
        }
        if !(1..=8).contains(&self.default_scale_factor) {
            return Err(MiragicError::configuration(format!(
                "Default scale factor must be between 1 and 8, got {}",
                self.default_scale_factor
            )));
        }
        if !(0..=255).contains(&self.default_threshold) {
            return Err(MiragicError::configuration(format!(
                "Default threshold must be between 0 and 255, got {}",
                self.default_threshold
            )));
        }

        if self.supported_formats.is_empty() {
            return Err(MiragicError::configuration(
                "At least one supported format is required",
            ));
        }

        Ok(SdkConfig {
            api_key: SecretString::new(self.api_key),
            api_base_url,
            api_timeout: self.api_timeout,
            max_retries: self.max_retries,
            default_blur_strength: self.default_blur_strength,
            default_scale_factor: self.default_scale_factor,
            default_threshold: self.default_threshold,
            input_dir: self.input_dir,
            output_dir: self.output_dir,
            supported_formats: self.supported_formats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_env_defaults() {
        let config = SdkConfig::from_env_with(env_from(&[(ENV_API_KEY, "secret-key")]))
            .unwrap();

        assert_eq!(config.api_key(), "secret-key");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api_timeout, 30);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.default_threshold, 128);
        assert_eq!(config.default_scale_factor, 2);
        assert!((config.default_blur_strength - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_env_overrides() {
        let config = SdkConfig::from_env_with(env_from(&[
            (ENV_API_KEY, "k"),
            (ENV_API_BASE_URL, "http://localhost:8080/v2/"),
            (ENV_API_TIMEOUT, "90"),
            (ENV_API_MAX_RETRIES, "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080/v2");
        assert_eq!(config.api_timeout, 90);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = SdkConfig::from_env_with(env_from(&[]));
        assert!(matches!(result, Err(MiragicError::Configuration(_))));

        let result = SdkConfig::from_env_with(env_from(&[(ENV_API_KEY, "   ")]));
        assert!(matches!(result, Err(MiragicError::Configuration(_))));
    }

    #[test]
    fn test_from_env_invalid_timeout() {
        let result =
            SdkConfig::from_env_with(env_from(&[(ENV_API_KEY, "k"), (ENV_API_TIMEOUT, "soon")]));
        let err = result.unwrap_err();
        assert!(matches!(err, MiragicError::Configuration(_)));
        assert!(err.to_string().contains(ENV_API_TIMEOUT));
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(SdkConfig::builder("").build().is_err());
        assert!(SdkConfig::builder("k")
            .api_base_url("not a url")
            .build()
            .is_err());
        assert!(SdkConfig::builder("k")
            .api_base_url("ftp://files.example.com")
            .build()
            .is_err());
        assert!(SdkConfig::builder("k").api_timeout(0).build().is_err());
        assert!(SdkConfig::builder("k")
            .default_blur_strength(1.5)
            .build()
            .is_err());
        assert!(SdkConfig::builder("k")
            .default_scale_factor(9)
            .build()
            .is_err());
        assert!(SdkConfig::builder("k")
            .default_threshold(256)
            .build()
            .is_err());
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = SdkConfig::builder("super-secret-value").build().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert_eq!(config.api_key_hint(), "...alue");
    }

    #[test]
    fn test_supported_formats_case_insensitive() {
        let config = SdkConfig::builder("k").build().unwrap();
        assert!(config.is_supported_format("a.JPG"));
        assert!(config.is_supported_format("dir/b.webp"));
        assert!(config.is_supported_format("c.TIFF"));
        assert!(!config.is_supported_format("d.gif"));
        assert!(!config.is_supported_format("no_extension"));

        let config = SdkConfig::builder("k")
            .supported_formats([".PNG"])
            .build()
            .unwrap();
        assert!(config.is_supported_format("x.png"));
        assert!(!config.is_supported_format("x.jpg"));
    }

    #[test]
    fn test_validate_and_setup_directories() {
        let temp = TempDir::new().unwrap();
        let config = SdkConfig::builder("k")
            .input_dir(temp.path().join("in"))
            .output_dir(temp.path().join("out"))
            .build()
            .unwrap();

        assert!(!config.validate());

        config.setup_directories().unwrap();
        // Idempotent
        config.setup_directories().unwrap();

        assert!(temp.path().join("in").is_dir());
        assert!(temp.path().join("out").is_dir());
        assert!(config.validate());
    }

    #[test]
    fn test_option_defaults_follow_config() {
        let config = SdkConfig::builder("k")
            .default_threshold(90)
            .default_scale_factor(4)
            .default_blur_strength(0.3)
            .build()
            .unwrap();

        assert_eq!(config.remove_background_options().threshold, 90);
        assert_eq!(config.upscale_options().scale_factor, 4);
        assert!((config.blur_options().blur_strength - 0.3).abs() < f32::EPSILON);

        let stock = SdkConfig::builder("k").build().unwrap();
        assert_eq!(stock.remove_background_options(), RemoveBackgroundOptions::default());
        assert_eq!(stock.upscale_options(), UpscaleOptions::default());
        assert_eq!(stock.blur_options(), BlurOptions::default());
    }
}
