//! Configuration System
//!
//! Runtime settings for the resolver: where the generator and player documents live,
//! which player store backend to use, cache behaviour and logging. Layered from
//! built-in defaults, a global file, a file in the data directory and `OREGEN_*`
//! environment variables. Generator definitions themselves live in the generator
//! document, not here.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OregenConfig {
    /// Storage locations and backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// Resolution cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Player store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerBackend {
    /// `players.<uuid>` sections in a TOML document
    #[default]
    Document,
    /// A sled database
    Sled,
}

/// Storage paths; relative paths resolve against the data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_generators_file")]
    pub generators_file: PathBuf,

    #[serde(default = "default_players_file")]
    pub players_file: PathBuf,

    #[serde(default)]
    pub player_backend: PlayerBackend,

    #[serde(default = "default_sled_path")]
    pub sled_path: PathBuf,
}

fn default_generators_file() -> PathBuf {
    PathBuf::from("generators.toml")
}

fn default_players_file() -> PathBuf {
    PathBuf::from("players.toml")
}

fn default_sled_path() -> PathBuf {
    PathBuf::from("players.sled")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            generators_file: default_generators_file(),
            players_file: default_players_file(),
            player_backend: PlayerBackend::default(),
            sled_path: default_sled_path(),
        }
    }
}

impl StorageConfig {
    pub fn generators_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.generators_file)
    }

    pub fn players_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.players_file)
    }

    pub fn sled_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.sled_path)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.generators_file.as_os_str().is_empty() {
            return Err("Generators file cannot be empty".to_string());
        }
        match self.player_backend {
            PlayerBackend::Document if self.players_file.as_os_str().is_empty() => {
                Err("Players file cannot be empty".to_string())
            }
            PlayerBackend::Sled if self.sled_path.as_os_str().is_empty() => {
                Err("Sled path cannot be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Resolution cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a resolved assignment stays fresh, in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Number of independently locked shards
    #[serde(default = "default_shards")]
    pub shards: usize,

    /// Sweep stale entries once the cache holds more than this many players
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_ttl_ms() -> u64 {
    5000
}

fn default_shards() -> usize {
    crate::cache::DEFAULT_SHARDS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            shards: default_shards(),
            max_entries: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_ms == 0 {
            return Err("TTL must be greater than zero".to_string());
        }
        if self.shards == 0 {
            return Err("Shard count must be greater than zero".to_string());
        }
        if self.max_entries == Some(0) {
            return Err("max_entries must be greater than zero when set".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Storage(String),
    Cache(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Cache(msg) => write!(f, "Cache: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl OregenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if let Err(e) = self.cache.validate() {
            errors.push(ValidationError::Cache(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Platform data directory for oregen (`$XDG_DATA_HOME/oregen` on Linux)
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "oregen")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".oregen"))
}
