//! Configuration management (config.toml in the platform config directory)
//!
//! Every field has a default, so a partial or missing file is fine.
//! Command-line flags are applied on top of whatever is loaded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gbhost_shared::fs::{MAX_MANIFEST_BYTES, MAX_ROM_BYTES, read_file_with_limit};
use gbhost_shared::{DEFAULT_BASE_URL, DEFAULT_RESOURCES, ManifestError, ResourceManifest};

const CONFIG_FILE: &str = "config.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where and what to load
    #[serde(default)]
    pub loader: LoaderConfig,
    /// How the display buffer is shown
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Resource loading settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Base URL resource names are resolved against (default: http://localhost:8080/)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Resource names in load order (default: bootRom.gb, tetris.gb)
    #[serde(default = "default_resources")]
    pub resources: Vec<String>,
    /// Per-request timeout in seconds (default: none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Largest resource accepted, in bytes (default: 8 MiB)
    #[serde(default = "default_max_resource_bytes")]
    pub max_resource_bytes: u64,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Print the raw `<br>` markup instead of one line per entry
    #[serde(default)]
    pub html: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_resources() -> Vec<String> {
    DEFAULT_RESOURCES.iter().map(|s| s.to_string()).collect()
}
fn default_max_resource_bytes() -> u64 {
    MAX_ROM_BYTES
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resources: default_resources(),
            timeout_secs: None,
            max_resource_bytes: default_max_resource_bytes(),
        }
    }
}

impl LoaderConfig {
    /// Build a validated manifest from the configured names
    pub fn manifest(&self) -> Result<ResourceManifest, ManifestError> {
        ResourceManifest::new(self.resources.iter().cloned())
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.gbhost", "", "gbhost")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Load config from the platform config directory, or return defaults.
///
/// A missing or unparseable file falls back to defaults with a warning.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config: {:#}", e);
            Config::default()
        }
    }
}

/// Load config from an explicit path
pub fn load_from(path: &Path) -> Result<Config> {
    let bytes = read_file_with_limit(path, MAX_MANIFEST_BYTES)?;
    let content = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Save config to the platform config directory
pub fn save(config: &Config) -> Result<()> {
    if let Some(dir) = config_dir() {
        save_to(config, &dir.join(CONFIG_FILE))?;
    }
    Ok(())
}

/// Save config to an explicit path, creating parent directories
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
