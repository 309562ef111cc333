//! Generator Service
//!
//! Single entry point for hosts: opens the generator and player stores described by
//! `OregenConfig`, loads the catalog, seeds the resolution cache from stored player
//! records and exposes resolution alongside catalog management.

use crate::cache::{Clock, ResolutionCache, SystemClock};
use crate::catalog::GeneratorCatalog;
use crate::config::{OregenConfig, PlayerBackend};
use crate::document::Document;
use crate::error::OregenError;
use crate::generator::GeneratorDefinition;
use crate::player::{DocumentPlayerStore, PlayerOverrideStore, SledPlayerStore};
use crate::provider::{IslandLevelProvider, PlayerStateProvider};
use crate::resolver::GeneratorResolver;
use crate::types::PlayerId;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Host-facing generator service
pub struct GeneratorService {
    catalog: Arc<GeneratorCatalog>,
    resolver: GeneratorResolver,
}

impl GeneratorService {
    /// Open the stores under `data_dir` as configured and seed the cache
    pub fn open(
        config: &OregenConfig,
        data_dir: &Path,
        players: Arc<dyn PlayerStateProvider>,
        levels: Arc<dyn IslandLevelProvider>,
    ) -> Result<Self, OregenError> {
        Self::open_with_clock(config, data_dir, players, levels, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        config: &OregenConfig,
        data_dir: &Path,
        players: Arc<dyn PlayerStateProvider>,
        levels: Arc<dyn IslandLevelProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, OregenError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            OregenError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        let generators_path = config.storage.generators_path(data_dir);
        let catalog = Arc::new(GeneratorCatalog::load(Document::new(&generators_path))?);

        let store: Arc<dyn PlayerOverrideStore> = match config.storage.player_backend {
            PlayerBackend::Document => Arc::new(
                DocumentPlayerStore::open(config.storage.players_path(data_dir))
                    .map_err(OregenError::ConfigLoad)?,
            ),
            PlayerBackend::Sled => Arc::new(
                SledPlayerStore::open(config.storage.sled_path(data_dir))
                    .map_err(OregenError::ConfigLoad)?,
            ),
        };

        let cache = Arc::new(ResolutionCache::with_shards(
            config.cache.ttl(),
            config.cache.shards,
            config.cache.max_entries,
        ));

        let service = Self::new(catalog, cache, store, players, levels, clock);
        let seeded = service
            .resolver
            .seed_from_store()
            .map_err(OregenError::ConfigLoad)?;
        info!(
            data_dir = %data_dir.display(),
            backend = ?config.storage.player_backend,
            seeded,
            "Generator service ready"
        );
        Ok(service)
    }

    /// Assemble a service from already-built parts. The cache is not seeded.
    pub fn new(
        catalog: Arc<GeneratorCatalog>,
        cache: Arc<ResolutionCache>,
        store: Arc<dyn PlayerOverrideStore>,
        players: Arc<dyn PlayerStateProvider>,
        levels: Arc<dyn IslandLevelProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolver = GeneratorResolver::new(catalog.clone(), cache, store, players, levels, clock);
        Self { catalog, resolver }
    }

    pub fn catalog(&self) -> &Arc<GeneratorCatalog> {
        &self.catalog
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        self.resolver.cache()
    }

    /// Generator currently applying to `player`
    pub fn resolve(&self, player: &PlayerId) -> Arc<GeneratorDefinition> {
        self.resolver.resolve(player)
    }

    /// Forget the cached assignment for `player`, e.g. after a permission change
    pub fn invalidate_player(&self, player: &PlayerId) {
        self.resolver.invalidate(player);
    }

    /// Re-read the generator document. Cached assignments are kept until they expire.
    pub fn reload_config(&self) -> Result<(), OregenError> {
        self.catalog.reload()
    }

    pub fn add_generator(&self, definition: GeneratorDefinition) -> Result<bool, OregenError> {
        self.catalog.add(definition)
    }

    pub fn remove_generator(&self, name: &str) -> Result<bool, OregenError> {
        self.catalog.remove(name)
    }

    pub fn update_generator(
        &self,
        name: &str,
        definition: GeneratorDefinition,
    ) -> Result<bool, OregenError> {
        self.catalog.update(name, definition)
    }

    pub fn find_generator_by_name(&self, name: Option<&str>) -> Option<Arc<GeneratorDefinition>> {
        self.catalog.find_by_name(name)
    }

    pub fn list_generators(&self) -> Vec<Arc<GeneratorDefinition>> {
        self.catalog.all()
    }

    pub fn default_generator(&self) -> Arc<GeneratorDefinition> {
        self.catalog.default_generator()
    }

    pub fn disabled_worlds(&self) -> Vec<String> {
        self.catalog.disabled_worlds()
    }

    pub fn set_disabled_worlds(&self, worlds: Vec<String>) -> Result<(), OregenError> {
        self.catalog.set_disabled_worlds(worlds)
    }

    pub fn is_world_disabled(&self, world: &str) -> bool {
        self.catalog.is_world_disabled(world)
    }

    pub fn is_debug(&self) -> bool {
        self.catalog.is_debug()
    }

    pub fn toggle_debug(&self) -> Result<bool, OregenError> {
        self.catalog.toggle_debug()
    }

    /// Carry over settings from an older generator document
    pub fn migrate(&self, old_config: &Path) -> Result<(), OregenError> {
        let old = Document::open(old_config).map_err(OregenError::ConfigLoad)?;
        self.catalog.migrate(&old)
    }
}
