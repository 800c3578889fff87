use std::path::{Path, PathBuf};

use ejournal_core::config::StoreConfig;
use ejournal_core::fs::write_atomic;
use ejournal_core::paths::expand_home;
use serde::{Deserialize, Serialize};

/// The on-disk CLI config file.
///
/// ```toml
/// [journal]
/// storage_directory = "~/ejournal"
/// salt = "..."
/// work_factor = 19
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EjournalConfig {
    pub journal: StoreConfig,
}

impl EjournalConfig {
    pub fn new(journal: StoreConfig) -> Self {
        Self { journal }
    }
}

/// Config path from `--config`/`EJOURNAL_CONFIG`, or the XDG default.
pub fn resolve_config_path(explicit: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(value) = explicit {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<EjournalConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Write the config with owner-only permissions; it holds the salt.
pub fn write_config(path: &Path, config: &EjournalConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    config_dir(std::env::var("XDG_CONFIG_HOME").ok().as_deref())
}

/// `$XDG_CONFIG_HOME/ejournal`, falling back to `~/.config/ejournal`.
///
/// The home directory is resolved the same way journal directories are.
fn config_dir(xdg_config_home: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(value) = xdg_config_home {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("ejournal"));
        }
    }
    Ok(expand_home("~/.config/ejournal")?)
}
