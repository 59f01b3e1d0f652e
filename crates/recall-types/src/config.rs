//! Configuration loading for agent-recall.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The config file lives at ~/.config/agent-recall/config.toml; environment
//! variables use the RECALL_ prefix (RECALL_STORAGE_DIR, RECALL_MODEL_REPO,
//! RECALL_CACHE_CAPACITY, RECALL_LOG_LEVEL).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RecallError;

/// Settings for the index storage root, embedding model, and load cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Directory holding the persisted index artifacts.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// HuggingFace repository of the embedding model.
    #[serde(default = "default_model_repo")]
    pub model_repo: String,

    /// Maximum number of loaded indexes kept in memory.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_storage_dir() -> String {
    ProjectDirs::from("", "", "agent-recall")
        .map(|p| p.data_dir().join("indexes").to_string_lossy().to_string())
        .unwrap_or_else(|| "./indexes".to_string())
}

fn default_model_repo() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_cache_capacity() -> usize {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            model_repo: default_model_repo(),
            cache_capacity: default_cache_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl RecallConfig {
    /// Load configuration from all layered sources.
    ///
    /// Precedence, lowest to highest: built-in defaults, the default config
    /// file, a CLI-specified config file, environment variables. CLI flag
    /// overrides are applied by the caller on the returned value.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, RecallError> {
        let config_dir = ProjectDirs::from("", "", "agent-recall")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("storage_dir", default_storage_dir())
            .map_err(|e| RecallError::Config(e.to_string()))?
            .set_default("model_repo", default_model_repo())
            .map_err(|e| RecallError::Config(e.to_string()))?
            .set_default("cache_capacity", default_cache_capacity() as i64)
            .map_err(|e| RecallError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| RecallError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("RECALL").try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| RecallError::Config(e.to_string()))?;

        let settings: Self = config
            .try_deserialize()
            .map_err(|e| RecallError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), RecallError> {
        if self.cache_capacity == 0 {
            return Err(RecallError::InvalidInput(
                "cache_capacity must be > 0".to_string(),
            ));
        }
        if self.model_repo.trim().is_empty() {
            return Err(RecallError::InvalidInput(
                "model_repo must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Storage root as a path.
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_dir)
    }
}
