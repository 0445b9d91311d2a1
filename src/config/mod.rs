//! Configuration for Tareas.
//!
//! ## config.kdl - User preferences
//!
//! Located at `$TAREAS_CONFIG_DIR/config.kdl`, or `~/.config/tareas/config.kdl`.
//!
//! Contains:
//! - `api-url` - Base URL of the task API
//! - `page-size` - Tasks per page in `task list`
//! - `output-format` - "json" or "human"
//!
//! ## Data directory
//!
//! `$TAREAS_DATA_DIR`, or `~/.local/share/tareas`. Holds `session.kdl`, which
//! contains the bearer token and is written 0600 by [`crate::session`].
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.kdl > defaults. Use the
//! [`resolver`] module for resolution with source tracking.

pub mod resolver;
pub mod schema;

pub use resolver::{
    API_URL_ENV, ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config,
    resolve_with_file,
};
#[cfg(unix)]
pub use schema::CONFIG_FILE_MODE;
pub use schema::{CONFIG_KEYS, MAX_PAGE_SIZE, OutputFormat, TareasConfig};

use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TAREAS_DATA_DIR";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TAREAS_CONFIG_DIR";

pub const CONFIG_FILE: &str = "config.kdl";

fn env_dir(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Directory holding session state.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env_dir(DATA_DIR_ENV) {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("tareas"))
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))
}

/// Directory holding config.kdl.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = env_dir(CONFIG_DIR_ENV) {
        return Ok(dir);
    }
    dirs::config_dir()
        .map(|d| d.join("tareas"))
        .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Read config.kdl. A missing file is an empty config.
pub fn read_config() -> Result<TareasConfig> {
    let path = config_path()?;
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TareasConfig::default()),
        Err(e) => return Err(e.into()),
    };
    let doc: KdlDocument = content.parse()?;
    Ok(TareasConfig::from_kdl(&doc))
}

/// Write config.kdl, creating the directory as needed.
pub fn write_config(config: &TareasConfig) -> Result<PathBuf> {
    config.validate().map_err(Error::InvalidInput)?;
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut doc = config.to_kdl();
    doc.autoformat();
    fs::write(&path, doc.to_string())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(CONFIG_FILE_MODE))?;
    }

    tracing::debug!(path = %path.display(), "config written");
    Ok(path)
}
