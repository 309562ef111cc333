//! Player Override Store
//!
//! Durable record of the generator last assigned to each player. Writes are flushed
//! before `set` returns. Two backends: the `players.<uuid>` section of a TOML
//! document, and a sled tree.

pub mod document_store;
pub mod sled_store;

pub use document_store::DocumentPlayerStore;
pub use sled_store::SledPlayerStore;

use crate::error::StoreError;
use crate::types::PlayerId;
use serde::{Deserialize, Serialize};

/// Persisted assignment for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player: PlayerId,
    /// Generator name last assigned
    pub generator: String,
    /// Display name at the time of the assignment
    pub name: Option<String>,
}

/// Player override store interface
pub trait PlayerOverrideStore: Send + Sync {
    /// Generator name last persisted for `player`; `None` when never assigned
    fn get(&self, player: &PlayerId) -> Result<Option<String>, StoreError>;

    /// Persist an assignment. Blocks until the write is durable.
    fn set(&self, player: &PlayerId, generator: &str, display_name: &str)
        -> Result<(), StoreError>;

    /// Every stored record, for seeding the resolution cache
    fn entries(&self) -> Result<Vec<PlayerRecord>, StoreError>;
}
