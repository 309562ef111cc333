//! Generator Resolver
//!
//! Decides which generator applies to a player. A fresh cache hit returns
//! immediately. Otherwise online players are re-evaluated against the catalog,
//! the result is reconciled with the player store and cached; offline players get
//! whatever was cached last, or the default generator.

use crate::cache::{Clock, ResolutionCache};
use crate::catalog::{CatalogState, GeneratorCatalog};
use crate::error::StoreError;
use crate::generator::GeneratorDefinition;
use crate::player::PlayerOverrideStore;
use crate::provider::{IslandLevelProvider, PlayerStateProvider};
use crate::types::PlayerId;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Pick the generator for a player from `catalog`.
///
/// A generator qualifies when `(rank > 0 && permitted && level >= island_level) ||
/// is_default`, so the default always qualifies. Among qualifying generators the
/// lowest positive rank wins; a non-positive rank (only possible on the default) is
/// the unranked sentinel and sorts after every ranked candidate. Ties go to the
/// earlier generator in catalog order.
pub fn select_generator<F>(
    catalog: &CatalogState,
    mut has_permission: F,
    island_level: i64,
) -> Arc<GeneratorDefinition>
where
    F: FnMut(&str) -> bool,
{
    catalog
        .generators()
        .iter()
        .filter(|generator| {
            (generator.rank > 0
                && has_permission(&generator.permission())
                && island_level >= generator.island_level)
                || generator.is_default
        })
        .min_by_key(|generator| (generator.rank <= 0, generator.rank))
        .cloned()
        .unwrap_or_else(|| catalog.default_generator().clone())
}

/// Whether a newly selected generator should be written to the player store.
///
/// Unchanged assignments are skipped, and so is a first assignment of the default
/// generator to a player with no record.
pub fn should_persist(selected: &GeneratorDefinition, persisted: Option<&str>) -> bool {
    persisted != Some(selected.name.as_str()) && (persisted.is_some() || !selected.is_default)
}

/// Resolves and caches player generators
pub struct GeneratorResolver {
    catalog: Arc<GeneratorCatalog>,
    cache: Arc<ResolutionCache>,
    store: Arc<dyn PlayerOverrideStore>,
    players: Arc<dyn PlayerStateProvider>,
    levels: Arc<dyn IslandLevelProvider>,
    clock: Arc<dyn Clock>,
}

impl GeneratorResolver {
    pub fn new(
        catalog: Arc<GeneratorCatalog>,
        cache: Arc<ResolutionCache>,
        store: Arc<dyn PlayerOverrideStore>,
        players: Arc<dyn PlayerStateProvider>,
        levels: Arc<dyn IslandLevelProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            cache,
            store,
            players,
            levels,
            clock,
        }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Generator currently applying to `player`. Never fails: store errors are logged
    /// and unknown players fall back to the default generator.
    pub fn resolve(&self, player: &PlayerId) -> Arc<GeneratorDefinition> {
        let now = self.clock.now();
        let cached = self.cache.get(player);
        if let Some(entry) = &cached {
            if entry.is_fresh(now, self.cache.ttl()) {
                return entry.generator.clone();
            }
        }

        if !self.players.is_online(player) {
            return match cached {
                Some(entry) => entry.generator,
                None => self.catalog.default_generator(),
            };
        }

        let catalog = self.catalog.snapshot();
        let island_level = self.levels.island_level(player);
        let selected = select_generator(
            &catalog,
            |permission| self.players.has_permission(player, permission),
            island_level,
        );

        match self.store.get(player) {
            Ok(persisted) => {
                if should_persist(&selected, persisted.as_deref()) {
                    self.persist(player, &selected, persisted.as_deref(), catalog.debug());
                }
            }
            Err(e) => {
                warn!(player = %player, error = %e, "Failed to read player record, skipping write");
            }
        }

        self.cache.insert(*player, selected.clone(), now);
        selected
    }

    fn persist(
        &self,
        player: &PlayerId,
        selected: &GeneratorDefinition,
        previous: Option<&str>,
        verbose: bool,
    ) {
        let display_name = self.players.display_name(player);
        if verbose {
            info!(player = %player, name = %display_name, previous = ?previous, generator = %selected.name, "Saving player generator");
        } else {
            debug!(player = %player, previous = ?previous, generator = %selected.name, "Saving player generator");
        }
        if let Err(e) = self.store.set(player, &selected.name, &display_name) {
            error!(player = %player, generator = %selected.name, error = %e, "Failed to save player generator");
        }
    }

    /// Drop the cached assignment so the next `resolve` re-evaluates the player
    pub fn invalidate(&self, player: &PlayerId) {
        self.cache.invalidate(player);
    }

    /// Pre-load every stored assignment into the cache as stale entries.
    ///
    /// Records naming a generator that no longer exists seed the default generator.
    /// Returns how many entries were seeded.
    pub fn seed_from_store(&self) -> Result<usize, StoreError> {
        let catalog = self.catalog.snapshot();
        let now = self.clock.now();
        let records = self.store.entries()?;
        for record in &records {
            let generator = match catalog.find_by_name(Some(&record.generator)) {
                Some(generator) => generator,
                None => {
                    warn!(
                        player = %record.player,
                        generator = %record.generator,
                        "Stored generator no longer exists, seeding default"
                    );
                    catalog.default_generator().clone()
                }
            };
            self.cache.seed(record.player, generator, now);
        }
        debug!(players = records.len(), "Seeded resolution cache from player store");
        Ok(records.len())
    }
}
