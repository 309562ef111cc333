//! Sled-backed player store.

use super::{PlayerOverrideStore, PlayerRecord};
use crate::error::StoreError;
use crate::types::PlayerId;
use std::path::Path;

const TREE_PLAYERS: &str = "players";

/// Player records keyed by the player's UUID bytes, values JSON encoded
pub struct SledPlayerStore {
    players: sled::Tree,
}

impl SledPlayerStore {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::new(&sled::open(path)?)
    }

    /// Use the `players` tree of an already open database
    pub fn new(db: &sled::Db) -> Result<Self, StoreError> {
        Ok(Self {
            players: db.open_tree(TREE_PLAYERS)?,
        })
    }

    fn record(&self, player: &PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        let Some(raw) = self.players.get(player.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }
}

impl PlayerOverrideStore for SledPlayerStore {
    fn get(&self, player: &PlayerId) -> Result<Option<String>, StoreError> {
        Ok(self.record(player)?.map(|record| record.generator))
    }

    fn set(
        &self,
        player: &PlayerId,
        generator: &str,
        display_name: &str,
    ) -> Result<(), StoreError> {
        let record = PlayerRecord {
            player: *player,
            generator: generator.to_string(),
            name: Some(display_name.to_string()),
        };
        let value = serde_json::to_vec(&record)?;
        self.players.insert(player.as_bytes(), value)?;
        self.players.flush()?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let mut records = Vec::new();
        for item in self.players.iter() {
            let (_, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}
