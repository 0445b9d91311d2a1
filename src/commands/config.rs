//! Config commands.

use super::{Output, json};
use crate::config::{self, ConfigOverrides, Resolved, TareasConfig, resolve_config};
use crate::{Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

impl ConfigEntry {
    fn new<T: ToString>(key: &'static str, resolved: &Resolved<T>) -> Self {
        Self {
            key,
            value: resolved.value.to_string(),
            source: resolved.source.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigShow {
    pub config_file: String,
    pub data_dir: String,
    pub entries: Vec<ConfigEntry>,
    pub version: &'static str,
    pub commit: &'static str,
    pub built: &'static str,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Config: {}", self.config_file)];
        lines.push(format!("Data:   {}", self.data_dir));
        for entry in &self.entries {
            lines.push(format!("  {} = {} ({})", entry.key, entry.value, entry.source));
        }
        lines.push(format!(
            "tareas {} ({}, built {})",
            self.version, self.commit, self.built
        ));
        lines.join("\n")
    }
}

/// Resolved configuration with sources. Does not need a session.
pub fn config_show(overrides: &ConfigOverrides) -> Result<ConfigShow> {
    let resolved = resolve_config(overrides)?;
    Ok(ConfigShow {
        config_file: config::config_path()?.display().to_string(),
        data_dir: config::data_dir()?.display().to_string(),
        entries: vec![
            ConfigEntry::new("api-url", &resolved.api_url),
            ConfigEntry::new("page-size", &resolved.page_size),
            ConfigEntry::new("output-format", &resolved.output_format),
        ],
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("TAREAS_GIT_COMMIT"),
        built: env!("TAREAS_BUILD_TIMESTAMP"),
    })
}

#[derive(Debug, Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
    pub path: String,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path)
    }
}

/// Update one key in config.kdl, keeping the others.
pub fn config_set(key: &str, value: &str) -> Result<ConfigSet> {
    let mut file: TareasConfig = config::read_config()?;
    file.set(key, value).map_err(Error::InvalidInput)?;
    let path = config::write_config(&file)?;
    Ok(ConfigSet {
        key: key.to_string(),
        value: value.to_string(),
        path: path.display().to_string(),
    })
}
