//! Subscriber setup for the pipeline binary.
//!
//! [`TracingSetup`] installs a `tracing-subscriber` registry with an
//! [`EnvFilter`] and one fmt layer in the chosen [`TracingFormat`]. The
//! emitter crate logs registration and wiring at `trace` and dispatch
//! summaries at `debug`, so `wirehook_emitter=debug` is a useful filter.
//!
//! # Example
//!
//! ```no_run
//! use example::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("example=info,wirehook_emitter=debug")
//!     .init();
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl TracingFormat {
    /// Parses a format name (`pretty`, `compact` or `json`), ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Builder for the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingSetup {
    /// Maximum log level, used when no filter is given.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Filter directives (e.g. `"example=info,wirehook_emitter=debug"`).
    env_filter: Option<String>,
    /// Whether span enter/exit events are logged.
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a setup with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets filter directives, `target=level,target=level,...`.
    ///
    /// Invalid directives fall back to the configured level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Builds the filter this setup installs.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
                tracing::warn!(%directives, error = %err, "invalid filter, using level");
                EnvFilter::new(self.level.as_str())
            }),
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        }
    }

    /// Installs the subscriber as the global default.
    ///
    /// Fails if a global subscriber is already installed.
    pub fn try_init(&self) -> Result<(), TryInitError> {
        let registry = tracing_subscriber::registry().with(self.filter());
        let fmt = tracing_subscriber::fmt::layer().with_span_events(self.span_events());

        match self.format {
            TracingFormat::Pretty => registry.with(fmt.pretty()).try_init()?,
            TracingFormat::Compact => registry.with(fmt.compact()).try_init()?,
            TracingFormat::Json => registry.with(fmt.json()).try_init()?,
        }

        tracing::debug!(level = %self.level, format = ?self.format, "tracing initialized");
        Ok(())
    }

    /// Installs the subscriber, keeping an already installed one.
    pub fn init(&self) {
        if self.try_init().is_err() {
            tracing::debug!("global subscriber already installed");
        }
    }
}
