//! Player records in a TOML document: `players.<uuid>.generator` and `players.<uuid>.name`.

use super::{PlayerOverrideStore, PlayerRecord};
use crate::document::Document;
use crate::error::StoreError;
use crate::types::PlayerId;
use parking_lot::Mutex;
use std::path::Path;
use tracing::warn;

const KEY_PLAYERS: &str = "players";

/// Document-backed player store
///
/// Writes are serialized on an internal mutex and applied to a copy of the document
/// that only replaces the live one after a successful save.
pub struct DocumentPlayerStore {
    document: Mutex<Document>,
}

impl DocumentPlayerStore {
    /// Open the store at `path`; a missing file starts empty
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self::from_document(Document::open(path)?))
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

fn generator_key(player: &PlayerId) -> String {
    format!("{}.{}.generator", KEY_PLAYERS, player)
}

fn name_key(player: &PlayerId) -> String {
    format!("{}.{}.name", KEY_PLAYERS, player)
}

impl PlayerOverrideStore for DocumentPlayerStore {
    fn get(&self, player: &PlayerId) -> Result<Option<String>, StoreError> {
        Ok(self.document.lock().get_string(&generator_key(player)))
    }

    fn set(
        &self,
        player: &PlayerId,
        generator: &str,
        display_name: &str,
    ) -> Result<(), StoreError> {
        let mut document = self.document.lock();
        let mut updated = document.clone();
        updated.set(&generator_key(player), generator)?;
        updated.set(&name_key(player), display_name)?;
        updated.save()?;
        *document = updated;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let document = self.document.lock();
        let mut records = Vec::new();
        for key in document.keys(KEY_PLAYERS) {
            let player = match PlayerId::parse_str(&key) {
                Ok(player) => player,
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping player record with invalid id");
                    continue;
                }
            };
            let Some(generator) = document.get_string(&generator_key(&player)) else {
                warn!(player = %player, "Skipping player record without generator");
                continue;
            };
            records.push(PlayerRecord {
                player,
                generator,
                name: document.get_string(&name_key(&player)),
            });
        }
        Ok(records)
    }
}
