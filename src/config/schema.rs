//! KDL schema for config.kdl.

use crate::api::DEFAULT_API_URL;
use crate::api::listing::DEFAULT_PAGE_SIZE;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Largest page size accepted from config or flags.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// api-url "http://localhost:8080/api"
/// page-size 10
/// output-format "human"  // or "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TareasConfig {
    /// Base URL of the task API, including the `/api` prefix
    pub api_url: Option<String>,

    /// Tasks per page in `task list`
    pub page_size: Option<u32>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,
}

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: [&str; 3] = ["api-url", "page-size", "output-format"];

impl TareasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.api_url {
            validate_api_url(url)?;
        }
        if let Some(size) = self.page_size {
            validate_page_size(size)?;
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown or ill-typed nodes are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "api-url") {
            config.api_url = Some(s.to_string());
        }

        if let Some(node) = doc.get("page-size") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    if (1..=MAX_PAGE_SIZE as i128).contains(&i) {
                        config.page_size = Some(i as u32);
                    }
                }
            }
        }

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(s);
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref url) = self.api_url {
            let mut node = KdlNode::new("api-url");
            node.push(KdlEntry::new(KdlValue::String(url.clone())));
            doc.nodes_mut().push(node);
        }

        if let Some(size) = self.page_size {
            let mut node = KdlNode::new("page-size");
            node.push(KdlEntry::new(KdlValue::Integer(size as i128)));
            doc.nodes_mut().push(node);
        }

        if let Some(format) = self.output_format {
            let mut node = KdlNode::new("output-format");
            node.push(KdlEntry::new(KdlValue::String(format.as_str().to_string())));
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &TareasConfig) {
        if other.api_url.is_some() {
            self.api_url = other.api_url.clone();
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
    }

    /// Set one key from its string form, as given to `config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "api-url" => {
                validate_api_url(value)?;
                self.api_url = Some(value.trim_end_matches('/').to_string());
            }
            "page-size" => {
                let size: u32 = value
                    .parse()
                    .map_err(|_| format!("page-size must be a number, got '{}'", value))?;
                validate_page_size(size)?;
                self.page_size = Some(size);
            }
            "output-format" => {
                self.output_format = Some(OutputFormat::parse(value).ok_or_else(|| {
                    format!("output-format must be 'json' or 'human', got '{}'", value)
                })?);
            }
            other => {
                return Err(format!(
                    "unknown config key '{}' (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        Ok(())
    }

    pub fn api_url_or_default(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn page_size_or_default(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

pub fn validate_api_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("api-url must start with http:// or https://, got '{}'", url))
    }
}

pub fn validate_page_size(size: u32) -> Result<(), String> {
    if (1..=MAX_PAGE_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(format!("page-size must be 1-{}, got {}", MAX_PAGE_SIZE, size))
    }
}

/// Permissions for config.kdl (Unix: 0644, readable by all).
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o644;
