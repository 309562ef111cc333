//! Resolution Cache
//!
//! Player → generator assignments with lazy TTL expiry. The map is split into
//! independently locked shards so a hit on one player never waits on writes for
//! another, and never touches the catalog lock. Entries are snapshots: replacing a
//! generator in the catalog does not change what is already cached.
//!
//! Stale entries stay in place until the player is resolved again; they are the
//! fallback for players that are offline. With a capacity bound configured, an
//! insert that pushes the cache over the bound sweeps stale entries first.

use crate::generator::GeneratorDefinition;
use crate::types::PlayerId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default time-to-live for a resolved assignment
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

/// Default number of cache shards
pub const DEFAULT_SHARDS: usize = 16;

/// Monotonic time source
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to; for driving expiry deterministically
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// A cached resolution for one player
#[derive(Debug, Clone)]
pub struct CachedAssignment {
    pub generator: Arc<GeneratorDefinition>,
    /// `None` for entries seeded from the player store and never resolved since
    pub resolved_at: Option<Instant>,
}

impl CachedAssignment {
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.resolved_at
            .map(|at| now.saturating_duration_since(at) < ttl)
            .unwrap_or(false)
    }
}

/// Sharded TTL cache of player assignments
pub struct ResolutionCache {
    shards: Vec<RwLock<HashMap<PlayerId, CachedAssignment>>>,
    ttl: Duration,
    max_entries: Option<usize>,
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_shards(ttl, DEFAULT_SHARDS, None)
    }

    /// `shards` is clamped to at least one. `max_entries` bounds the size loosely: stale
    /// entries are swept once it is exceeded, fresh ones are never dropped.
    pub fn with_shards(ttl: Duration, shards: usize, max_entries: Option<usize>) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            ttl,
            max_entries,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn shard(&self, player: &PlayerId) -> &RwLock<HashMap<PlayerId, CachedAssignment>> {
        let index = (player.as_u128() % self.shards.len() as u128) as usize;
        &self.shards[index]
    }

    /// Entry for `player`, fresh or stale
    pub fn get(&self, player: &PlayerId) -> Option<CachedAssignment> {
        self.shard(player).read().get(player).cloned()
    }

    /// Generator for `player` only if resolved less than one TTL before `now`
    pub fn get_fresh(&self, player: &PlayerId, now: Instant) -> Option<Arc<GeneratorDefinition>> {
        self.shard(player)
            .read()
            .get(player)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.generator.clone())
    }

    /// Record a resolution made at `now`, replacing any previous entry
    pub fn insert(&self, player: PlayerId, generator: Arc<GeneratorDefinition>, now: Instant) {
        self.put(
            player,
            CachedAssignment {
                generator,
                resolved_at: Some(now),
            },
            now,
        );
    }

    /// Record an assignment that has never been resolved; it is stale from the start
    pub fn seed(&self, player: PlayerId, generator: Arc<GeneratorDefinition>, now: Instant) {
        self.put(
            player,
            CachedAssignment {
                generator,
                resolved_at: None,
            },
            now,
        );
    }

    fn put(&self, player: PlayerId, entry: CachedAssignment, now: Instant) {
        self.shard(&player).write().insert(player, entry);
        if let Some(max) = self.max_entries {
            if self.len() > max {
                let evicted = self.evict_stale(now);
                debug!(evicted, max_entries = max, "Resolution cache over capacity");
            }
        }
    }

    /// Drop the entry for `player`, forcing the next lookup to resolve
    pub fn invalidate(&self, player: &PlayerId) -> bool {
        self.shard(player).write().remove(player).is_some()
    }

    /// Remove every stale entry; returns how many were removed
    pub fn evict_stale(&self, now: Instant) -> usize {
        let mut evicted = 0;
        for shard in &self.shards {
            let mut entries = shard.write();
            let before = entries.len();
            entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
            evicted += before - entries.len();
        }
        evicted
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.write().clear();
        }
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
