//! Tracing configuration for the CLI and demos
//!
//! The library only emits `log` and `tracing` events; installing a
//! subscriber is left to the binary. `RUST_LOG`, when set, overrides the
//! verbosity-derived filter.

#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Crates whose debug output is noise at `-vv`
const QUIET_DEPENDENCIES: &[&str] = &["hyper", "reqwest", "rustls", "h2"];

/// Configuration for tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Human-readable console output with colors
    #[default]
    Console,
    /// Plain compact output for CI logs
    Compact,
    /// JSON structured logging
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Configuration for tracing output destination
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// stderr (default)
    #[default]
    Console,
    /// Log file only
    #[cfg(feature = "tracing-files")]
    File(std::path::PathBuf),
    /// stderr and a log file
    #[cfg(feature = "tracing-files")]
    Both(std::path::PathBuf),
}

/// Keeps background log writers alive; drop it at the end of `main`
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct TracingGuard {
    #[cfg(feature = "tracing-files")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Tracing configuration builder
#[derive(Debug, Default)]
pub struct TracingConfig {
    /// Verbosity level from repeated `-v` flags
    pub verbosity: u8,
    pub format: TracingFormat,
    pub output: TracingOutput,
    /// Explicit filter directive (takes precedence over `RUST_LOG`)
    pub env_filter: Option<String>,
    /// Session ID logged at startup for correlation
    pub session_id: Option<String>,
}

impl TracingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_session_id<S: Into<String>>(mut self, session_id: S) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Level implied by the verbosity count
    #[must_use]
    pub fn verbosity_to_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Filter directive for the verbosity, keeping HTTP internals at `warn`
    /// below trace level
    #[must_use]
    pub fn verbosity_to_filter(&self) -> String {
        let level = self.verbosity_to_level();
        if self.verbosity >= 3 {
            return level.to_string();
        }
        let mut directive = level.to_string();
        for dependency in QUIET_DEPENDENCIES {
            directive.push_str(&format!(",{}=warn", dependency));
        }
        directive
    }

    /// Install the global subscriber
    ///
    /// # Errors
    /// - Invalid filter directive
    /// - A global subscriber is already installed
    #[cfg(feature = "cli")]
    pub fn init(self) -> anyhow::Result<TracingGuard> {
        use tracing_subscriber::fmt;

        let filter = match &self.env_filter {
            Some(directive) => EnvFilter::try_new(directive)?,
            None => match std::env::var(EnvFilter::DEFAULT_ENV) {
                Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive)?,
                _ => EnvFilter::try_new(self.verbosity_to_filter())?,
            },
        };

        let registry = Registry::default().with(filter);
        #[allow(unused_mut)]
        let mut guard = TracingGuard::default();

        match (&self.format, &self.output) {
            (TracingFormat::Console, TracingOutput::Console) => {
                let fmt_layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(false)
                    .with_level(true)
                    .compact();
                registry.with(fmt_layer).try_init()?;
            },

            (TracingFormat::Compact, TracingOutput::Console) => {
                let fmt_layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(false)
                    .compact();
                registry.with(fmt_layer).try_init()?;
            },

            #[cfg(feature = "tracing-json")]
            (TracingFormat::Json, TracingOutput::Console) => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true);
                registry.with(fmt_layer).try_init()?;
            },

            #[cfg(feature = "tracing-files")]
            (_, TracingOutput::File(path)) => {
                let (file_writer, file_guard) = file_writer(path);
                let fmt_layer = fmt::layer()
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .compact();
                registry.with(fmt_layer).try_init()?;
                guard._file_guard = Some(file_guard);
            },

            #[cfg(feature = "tracing-files")]
            (_, TracingOutput::Both(path)) => {
                let (file_writer, file_guard) = file_writer(path);
                let console_layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact();
                let file_layer = fmt::layer()
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .compact();
                registry.with(console_layer).with(file_layer).try_init()?;
                guard._file_guard = Some(file_guard);
            },
        }

        if let Some(session_id) = &self.session_id {
            tracing::info!(
                session_id = %session_id,
                version = env!("CARGO_PKG_VERSION"),
                "🚀 Miragic session started"
            );
        }

        Ok(guard)
    }
}

#[cfg(all(feature = "cli", feature = "tracing-files"))]
fn file_writer(
    path: &std::path::Path,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("miragic.log"));
    tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name))
}

/// Initialize tracing with CLI defaults and a fresh session id
///
/// # Errors
/// - See [`TracingConfig::init`]
#[cfg(feature = "cli")]
pub fn init_cli_tracing(verbosity: u8) -> anyhow::Result<TracingGuard> {
    let session_id = uuid::Uuid::new_v4().to_string();

    TracingConfig::new()
        .with_verbosity(verbosity)
        .with_format(TracingFormat::Console)
        .with_session_id(session_id)
        .init()
}
