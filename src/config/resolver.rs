//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`TAREAS_API_URL`)
//! 3. config.kdl
//! 4. Built-in defaults

use super::schema::{OutputFormat, TareasConfig, validate_api_url};
use crate::api::DEFAULT_API_URL;
use crate::api::listing::DEFAULT_PAGE_SIZE;
use crate::{Error, Result};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "TAREAS_API_URL";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_url: Resolved<String>,
    pub page_size: Resolved<u32>,
    pub output_format: Resolved<OutputFormat>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_url: Resolved::new(DEFAULT_API_URL.to_string(), ValueSource::Default),
            page_size: Resolved::new(DEFAULT_PAGE_SIZE, ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn api_url(&self) -> &str {
        &self.api_url.value
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub page_size: Option<u32>,
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Resolve configuration from the config file on disk, the environment, and
/// CLI overrides.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let file = super::read_config()?;
    resolve_with_file(&file, overrides)
}

/// Resolve against an already-loaded config file.
pub fn resolve_with_file(file: &TareasConfig, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let mut result = ResolvedConfig::default();

    // Resolve api_url
    let env_url = std::env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty());
    if let Some(ref url) = overrides.api_url {
        result.api_url = Resolved::new(url.clone(), ValueSource::CliFlag);
    } else if let Some(url) = env_url {
        result.api_url = Resolved::new(url, ValueSource::EnvVar(API_URL_ENV.to_string()));
    } else if let Some(ref url) = file.api_url {
        result.api_url = Resolved::new(url.clone(), ValueSource::ConfigFile);
    }
    validate_api_url(&result.api_url.value).map_err(|e| {
        Error::InvalidInput(format!("{} (from {})", e, result.api_url.source))
    })?;
    result.api_url.value = result.api_url.value.trim_end_matches('/').to_string();

    // Resolve page_size
    if let Some(size) = overrides.page_size {
        result.page_size = Resolved::new(size, ValueSource::CliFlag);
    } else if let Some(size) = file.page_size {
        result.page_size = Resolved::new(size, ValueSource::ConfigFile);
    }

    // Resolve output_format
    if let Some(format) = overrides.output_format {
        result.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = file.output_format {
        result.output_format = Resolved::new(format, ValueSource::ConfigFile);
    }

    tracing::debug!(
        api_url = %result.api_url.value,
        source = %result.api_url.source,
        "configuration resolved"
    );
    Ok(result)
}
