//! Integration tests for both player store backends

use oregen::player::{DocumentPlayerStore, PlayerOverrideStore, SledPlayerStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use uuid::Uuid;

fn exercise(store: &dyn PlayerOverrideStore) {
    let steve = Uuid::new_v4();
    let alex = Uuid::new_v4();

    assert_eq!(store.get(&steve).unwrap(), None);
    store.set(&steve, "iron", "Steve").unwrap();
    store.set(&alex, "gold", "Alex").unwrap();
    store.set(&steve, "gold", "Steve").unwrap();

    assert_eq!(store.get(&steve).unwrap().as_deref(), Some("gold"));
    let entries: HashMap<Uuid, String> = store
        .entries()
        .unwrap()
        .into_iter()
        .map(|record| (record.player, record.generator))
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[&alex], "gold");
}

#[test]
fn test_document_store_behaviour() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentPlayerStore::open(temp_dir.path().join("players.toml")).unwrap();
    exercise(&store);
}

#[test]
fn test_sled_store_behaviour() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledPlayerStore::open(temp_dir.path().join("players.sled")).unwrap();
    exercise(&store);
}

/// Concurrent writers all land in the document
#[test]
fn test_document_store_concurrent_writes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("players.toml");
    let store = Arc::new(DocumentPlayerStore::open(&path).unwrap());

    let players: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
    let handles: Vec<_> = players
        .iter()
        .copied()
        .map(|player| {
            let store = store.clone();
            thread::spawn(move || {
                for generator in ["iron", "gold"] {
                    store.set(&player, generator, "someone").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reopened = DocumentPlayerStore::open(&path).unwrap();
    let entries = reopened.entries().unwrap();
    assert_eq!(entries.len(), players.len());
    assert!(entries.iter().all(|record| record.generator == "gold"));
}

/// A players document that cannot be parsed is reported on open
#[test]
fn test_document_store_rejects_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("players.toml");
    std::fs::write(&path, "[players\n").unwrap();
    assert!(DocumentPlayerStore::open(&path).is_err());
}
