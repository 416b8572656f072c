//! Persistent CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use aetherkit_core::{ReconcilePolicy, RenderMode};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";
const CONFIG_ENV: &str = "AETHERKIT_CONFIG";
const DB_PATH_ENV: &str = "AETHERKIT_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default = "default_import_policy")]
    pub import_policy: ReconcilePolicy,
    #[serde(default)]
    pub render_mode: RenderMode,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            db_path: None,
            import_policy: default_import_policy(),
            render_mode: RenderMode::default(),
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

const fn default_import_policy() -> ReconcilePolicy {
    ReconcilePolicy::TimestampWins
}

pub fn config_path() -> Result<PathBuf, String> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|dir| dir.join("aetherkit").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn default_db_path() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join("aetherkit").join("aetherkit.db"))
        .ok_or_else(|| "Failed to resolve CLI data directory".to_string())
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Database file: flag, then `AETHERKIT_DB_PATH`, then config, then the data dir.
    pub fn resolve_db_path(&self, cli_db_path: Option<PathBuf>) -> Result<PathBuf, String> {
        if let Some(path) = cli_db_path
            .or_else(|| env::var_os(DB_PATH_ENV).filter(|value| !value.is_empty()).map(PathBuf::from))
            .or_else(|| self.db_path.clone())
        {
            return Ok(path);
        }
        default_db_path()
    }

    fn normalize(&mut self) {
        if self
            .db_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().to_string_lossy().trim().is_empty())
        {
            self.db_path = None;
        }
    }
}
