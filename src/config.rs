//! Configuration for the intake client.
//!
//! The endpoint base address is resolved once, when the config is built,
//! and then injected into [`crate::SubmissionController`]. Nothing in the
//! library reads the environment after that point.
//!
//! # Addressing
//! An empty `api_base` means "same origin as the form": the request goes to
//! the relative path `/intake/`, resolved against `origin`. A non-empty base
//! replaces the origin entirely (`{api_base}/intake/`).

use crate::error::IntakeError;
use std::time::Duration;
use url::{ParseError, Url};

/// Upper bound for one intake call before it is abandoned as a timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Origin used to resolve relative addressing when no base is configured.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Path of the intake operation, relative to the base.
pub const INTAKE_PATH: &str = "/intake/";

/// Environment variable holding the API base override.
pub const API_URL_ENV: &str = "INTAKE_API_URL";

/// Environment variable holding the origin used for relative addressing.
pub const ORIGIN_ENV: &str = "INTAKE_ORIGIN";

/// Configuration for submitting to the intake endpoint.
///
/// Built via [`IntakeConfig::builder()`], [`IntakeConfig::from_env()`] or
/// [`IntakeConfig::default()`].
///
/// # Example
/// ```rust
/// use intake_client::IntakeConfig;
///
/// let config = IntakeConfig::builder()
///     .api_base("http://localhost:8000")
///     .timeout_ms(5_000)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint_url().unwrap().as_str(), "http://localhost:8000/intake/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// API base address. Empty means relative addressing against `origin`.
    pub api_base: String,

    /// Origin the form is served from. Only consulted when `api_base` is
    /// empty or itself relative. Default: `http://127.0.0.1:8000`.
    pub origin: String,

    /// Request timeout in milliseconds. Default: 10 000.
    pub timeout_ms: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl IntakeConfig {
    /// Create a new builder for `IntakeConfig`.
    pub fn builder() -> IntakeConfigBuilder {
        IntakeConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the configuration from `INTAKE_API_URL` and `INTAKE_ORIGIN`.
    ///
    /// Unset or blank variables fall back to the defaults.
    pub fn from_env() -> Result<Self, IntakeError> {
        let mut builder = Self::builder();
        if let Some(base) = env_non_blank(API_URL_ENV) {
            builder = builder.api_base(base);
        }
        if let Some(origin) = env_non_blank(ORIGIN_ENV) {
            builder = builder.origin(origin);
        }
        builder.build()
    }

    /// The intake address as the form would write it: `{api_base}/intake/`.
    ///
    /// With an empty base this is the relative path `/intake/`.
    pub fn endpoint_path(&self) -> String {
        format!("{}{}", self.api_base.trim().trim_end_matches('/'), INTAKE_PATH)
    }

    /// The absolute URL the POST is sent to. Only `http` and `https` are
    /// accepted.
    pub fn endpoint_url(&self) -> Result<Url, IntakeError> {
        let path = self.endpoint_path();
        let url = match Url::parse(&path) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => {
                let origin = Url::parse(self.origin.trim()).map_err(|e| {
                    IntakeError::InvalidConfig(format!("origin '{}': {}", self.origin, e))
                })?;
                origin.join(&path).map_err(|e| {
                    IntakeError::InvalidConfig(format!("endpoint '{}': {}", path, e))
                })?
            }
            Err(e) => {
                return Err(IntakeError::InvalidConfig(format!(
                    "API base '{}': {}",
                    self.api_base, e
                )))
            }
        };

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(IntakeError::InvalidConfig(format!(
                "endpoint '{}': unsupported scheme '{}' (expected http or https)",
                url, other
            ))),
        }
    }

    /// Whether the endpoint is addressed relative to the form's origin.
    pub fn is_relative(&self) -> bool {
        matches!(
            Url::parse(&self.endpoint_path()),
            Err(ParseError::RelativeUrlWithoutBase)
        )
    }

    /// The request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn env_non_blank(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for [`IntakeConfig`].
#[derive(Debug)]
pub struct IntakeConfigBuilder {
    config: IntakeConfig,
}

impl IntakeConfigBuilder {
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.config.origin = origin.into();
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IntakeConfig, IntakeError> {
        let c = &self.config;
        if c.timeout_ms == 0 {
            return Err(IntakeError::InvalidConfig("Timeout must be ≥ 1 ms".into()));
        }
        c.endpoint_url()?;
        Ok(self.config)
    }
}
