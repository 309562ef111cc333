//! Config loading facade: builds the layered source stack and deserializes it.

use super::merge::merge_policy;
use super::sources::{data_dir_file, global_file};
use super::OregenConfig;
use config::{ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Loads `OregenConfig` from defaults, files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `data_dir`.
    ///
    /// Precedence (lowest to highest): defaults, global file, `<data_dir>/oregen.toml`,
    /// `<data_dir>/oregen.{OREGEN_ENV}.toml`, `OREGEN_*` environment variables
    /// (`__` separates nested keys, e.g. `OREGEN_CACHE__TTL_MS`).
    pub fn load(data_dir: &Path) -> Result<OregenConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = data_dir_file::add_to_builder(builder, data_dir)?;
        let builder = builder.add_source(Self::environment());
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<OregenConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Path of the global config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn environment() -> Environment {
        Environment::with_prefix("OREGEN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
