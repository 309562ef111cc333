//! Data directory config file source: <data_dir>/oregen.toml and <data_dir>/oregen.{env}.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add data directory config files to builder.
/// Precedence: oregen.toml (base) then oregen.{OREGEN_ENV}.toml when OREGEN_ENV is set.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    data_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder;

    let base_config_path = data_dir.join("oregen.toml");
    if base_config_path.exists() {
        builder = builder.add_source(File::from(base_config_path.as_path()).required(false));
    }

    if let Ok(env_name) = std::env::var("OREGEN_ENV") {
        let env_config_path = data_dir.join(format!("oregen.{}.toml", env_name));
        if env_config_path.exists() {
            builder = builder.add_source(File::from(env_config_path.as_path()).required(false));
        }
    }

    Ok(builder)
}
