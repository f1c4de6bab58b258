//! Configuration file support for liftgen.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftgen/config.toml`.

use crate::types::MuscleGroup;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Defaults applied when the command line leaves a choice open
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,

    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,

    #[serde(default)]
    pub equipment: Vec<String>,

    #[serde(default)]
    pub workout_type: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration_minutes(),
            muscle_groups: Vec::new(),
            equipment: Vec::new(),
            workout_type: None,
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("liftgen")
}

fn default_duration_minutes() -> u32 {
    45
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("liftgen").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Path of the saved-template store
    pub fn templates_path(&self) -> PathBuf {
        self.data.data_dir.join("templates.jsonl")
    }
}
