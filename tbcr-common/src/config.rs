//! Configuration loading and root folder resolution
//!
//! Configuration is layered. For the root folder the priority order is:
//! 1. Explicit argument supplied by the embedding service (highest priority)
//! 2. `TBCR_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file never aborts startup: defaults are used and a warning
//! is logged. A TOML file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "TBCR_ROOT_FOLDER";

/// Environment variable overriding the realm allow-list (comma-separated)
pub const ALLOWED_REALMS_ENV: &str = "TBCR_ALLOWED_REALMS";

/// SQLite database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "tbcr.db";

/// Top-level TOML configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub import: ImportConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (`RUST_LOG` takes precedence when set)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[import]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Realms accepted by the character import.
    ///
    /// `None` accepts every realm. `Some(vec![])` accepts none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_realms: Option<Vec<String>>,
}

impl ImportConfig {
    /// Apply `TBCR_ALLOWED_REALMS` on top of the file-based settings
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ALLOWED_REALMS_ENV) {
            let realms = parse_realm_list(&raw);
            info!(
                count = realms.len(),
                "Realm allow-list loaded from {}", ALLOWED_REALMS_ENV
            );
            self.allowed_realms = Some(realms);
        }
        self
    }
}

/// Split a comma-separated realm list, dropping blank entries
pub fn parse_realm_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|realm| !realm.is_empty())
        .map(str::to_string)
        .collect()
}

/// Default config file location: `<config_dir>/tbcr/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tbcr").join(format!("{}.toml", module_name)))
}

/// Load a TOML config file
///
/// A missing file yields defaults (with a warning). A file that exists but
/// does not parse is reported as [`Error::Config`].
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found: {} (using defaults)",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))?;

    debug!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}

/// Resolves the root folder following the documented priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    config_path: Option<PathBuf>,
}

impl RootFolderResolver {
    /// Resolver using the module's default config file location
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            config_path: default_config_path(module_name),
        }
    }

    /// Use a specific TOML file instead of the default location
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Resolve without an explicit override
    pub fn resolve(&self) -> PathBuf {
        self.resolve_with(None)
    }

    /// Resolve, giving `explicit` the highest priority
    pub fn resolve_with(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            debug!(module = %self.module_name, "Root folder from explicit argument");
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!(module = %self.module_name, "Root folder from {}", ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        if let Some(config_path) = &self.config_path {
            match load_toml_config(config_path) {
                Ok(TomlConfig {
                    root_folder: Some(root),
                    ..
                }) => {
                    debug!(module = %self.module_name, "Root folder from TOML config");
                    return root;
                }
                Ok(_) => {}
                Err(e) => warn!("Ignoring unreadable config file: {}", e),
            }
        }

        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tbcr"))
        .unwrap_or_else(|| PathBuf::from("./tbcr_data"))
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if it does not exist
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
