//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("storage.generators_file", "generators.toml")?
        .set_default("storage.players_file", "players.toml")?
        .set_default("storage.player_backend", "document")?
        .set_default("cache.ttl_ms", 5000_i64)?
        .set_default("cache.shards", crate::cache::DEFAULT_SHARDS as u64)
}
