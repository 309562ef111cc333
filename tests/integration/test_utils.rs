//! Shared test utilities for integration tests
//!
//! Host provider fakes with call counters, a counting player store wrapper and
//! helpers for writing generator documents into temporary directories.

use oregen::cache::{ManualClock, ResolutionCache, DEFAULT_TTL};
use oregen::document::Document;
use oregen::error::StoreError;
use oregen::player::{DocumentPlayerStore, PlayerOverrideStore, PlayerRecord};
use oregen::provider::{IslandLevelProvider, PlayerStateProvider};
use oregen::{GeneratorCatalog, GeneratorService, PlayerId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Catalog used by the resolution scenarios
pub const SCENARIO_GENERATORS: &str = r#"
[generators.default]
rank = -1
[generators.default.blocks]
COBBLESTONE = 1.0

[generators.iron]
rank = 5
islandLevel = 10
[generators.iron.blocks]
COBBLESTONE = 0.8
IRON_ORE = 0.2

[generators.gold]
rank = 2
islandLevel = 20
[generators.gold.blocks]
COBBLESTONE = 0.7
GOLD_ORE = 0.3
"#;

/// Write `content` as the generator document in `dir`
pub fn write_generators(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("generators.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[derive(Default)]
struct PlayerState {
    online: HashSet<PlayerId>,
    permissions: HashMap<PlayerId, HashSet<String>>,
    levels: HashMap<PlayerId, i64>,
}

/// In-memory host: online players, permissions and island levels
#[derive(Default)]
pub struct FakeHost {
    state: Mutex<PlayerState>,
    pub permission_checks: AtomicUsize,
    pub level_queries: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_online(&self, player: PlayerId, online: bool) {
        let mut state = self.state.lock().unwrap();
        if online {
            state.online.insert(player);
        } else {
            state.online.remove(&player);
        }
    }

    pub fn grant(&self, player: PlayerId, permission: &str) {
        self.state
            .lock()
            .unwrap()
            .permissions
            .entry(player)
            .or_default()
            .insert(permission.to_string());
    }

    pub fn set_level(&self, player: PlayerId, level: i64) {
        self.state.lock().unwrap().levels.insert(player, level);
    }

    pub fn permission_checks(&self) -> usize {
        self.permission_checks.load(Ordering::SeqCst)
    }
}

impl PlayerStateProvider for FakeHost {
    fn is_online(&self, player: &PlayerId) -> bool {
        self.state.lock().unwrap().online.contains(player)
    }

    fn has_permission(&self, player: &PlayerId, capability: &str) -> bool {
        self.permission_checks.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .permissions
            .get(player)
            .map(|perms| perms.contains(capability))
            .unwrap_or(false)
    }

    fn display_name(&self, player: &PlayerId) -> String {
        format!("player-{}", &player.to_string()[..8])
    }
}

impl IslandLevelProvider for FakeHost {
    fn island_level(&self, player: &PlayerId) -> i64 {
        self.level_queries.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .levels
            .get(player)
            .copied()
            .unwrap_or(0)
    }
}

/// Player store wrapper that counts writes
pub struct CountingStore {
    inner: DocumentPlayerStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn open(path: &Path) -> Arc<Self> {
        Arc::new(Self {
            inner: DocumentPlayerStore::open(path).unwrap(),
            writes: AtomicUsize::new(0),
        })
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PlayerOverrideStore for CountingStore {
    fn get(&self, player: &PlayerId) -> Result<Option<String>, StoreError> {
        self.inner.get(player)
    }

    fn set(&self, player: &PlayerId, generator: &str, display_name: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(player, generator, display_name)
    }

    fn entries(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        self.inner.entries()
    }
}

/// A service over temporary files with a manual clock and fake host
pub struct Harness {
    pub dir: TempDir,
    pub host: Arc<FakeHost>,
    pub store: Arc<CountingStore>,
    pub clock: Arc<ManualClock>,
    pub service: GeneratorService,
}

impl Harness {
    pub fn new(generators: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let generators_path = write_generators(dir.path(), generators);
        let host = FakeHost::new();
        let store = CountingStore::open(&dir.path().join("players.toml"));
        let clock = Arc::new(ManualClock::new());

        let catalog = Arc::new(GeneratorCatalog::load(Document::new(&generators_path)).unwrap());
        let service = GeneratorService::new(
            catalog,
            Arc::new(ResolutionCache::new(DEFAULT_TTL)),
            store.clone(),
            host.clone(),
            host.clone(),
            clock.clone(),
        );

        Self {
            dir,
            host,
            store,
            clock,
            service,
        }
    }

    pub fn players_document(&self) -> Document {
        Document::open(self.dir.path().join("players.toml")).unwrap()
    }
}
