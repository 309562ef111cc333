//! Host Providers
//!
//! Interfaces the host server implements so generators can be resolved without the
//! resolver knowing anything about the server itself: online state, permission
//! checks, display names and the island level metric.

use crate::cache::Clock;
use crate::types::PlayerId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Player state as seen by the host server
pub trait PlayerStateProvider: Send + Sync {
    fn is_online(&self, player: &PlayerId) -> bool;

    /// Whether the player holds `capability`, e.g. `oregen.iron`
    fn has_permission(&self, player: &PlayerId, capability: &str) -> bool;

    fn display_name(&self, player: &PlayerId) -> String;
}

/// External island level metric
pub trait IslandLevelProvider: Send + Sync {
    fn island_level(&self, player: &PlayerId) -> i64;
}

/// Memoizes another level provider for a fixed duration per player.
///
/// Island level lookups are usually backed by a plugin that walks the island, so a
/// short memo keeps repeated resolutions cheap.
pub struct MemoizedLevelProvider {
    inner: Arc<dyn IslandLevelProvider>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    levels: Mutex<HashMap<PlayerId, (i64, Instant)>>,
}

impl MemoizedLevelProvider {
    pub fn new(inner: Arc<dyn IslandLevelProvider>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl,
            levels: Mutex::new(HashMap::new()),
        }
    }

    pub fn forget(&self, player: &PlayerId) {
        self.levels.lock().remove(player);
    }
}

impl IslandLevelProvider for MemoizedLevelProvider {
    fn island_level(&self, player: &PlayerId) -> i64 {
        let now = self.clock.now();
        if let Some((level, at)) = self.levels.lock().get(player) {
            if now.saturating_duration_since(*at) < self.ttl {
                return *level;
            }
        }
        // Queried outside the lock; a concurrent miss may ask the inner provider twice.
        let level = self.inner.island_level(player);
        self.levels.lock().insert(*player, (level, now));
        level
    }
}
