//! Ore Generators
//!
//! Immutable generator profiles: which blocks a generator spawns, at what chance,
//! and which rank and island level gate it. Once a definition is handed to the
//! catalog it is shared as `Arc<GeneratorDefinition>` and never mutated again, so
//! any copy held elsewhere (the resolution cache in particular) is a stable snapshot.

pub mod codec;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Permission prefix a player needs for a generator: `oregen.<name>`
pub const PERMISSION_PREFIX: &str = "oregen";

/// Name used for the synthesized fallback generator
pub const DEFAULT_GENERATOR_NAME: &str = "default";

/// Rank assigned when none is configured; non-positive ranks never qualify by permission
pub const UNRANKED: i64 = -1;

/// A block type and the probability it spawns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreBlock {
    pub block: String,
    pub chance: f64,
}

impl OreBlock {
    pub fn new(block: impl Into<String>, chance: f64) -> Self {
        Self {
            block: block.into(),
            chance,
        }
    }
}

/// Generator profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorDefinition {
    /// Unique key within the catalog
    pub name: String,
    /// Display label
    pub label: Option<String>,
    /// Item token shown in menus
    pub item: Option<String>,
    /// Short symbol token
    pub symbol: Option<String>,
    /// Minimum island level required to qualify
    pub island_level: i64,
    /// Priority among qualifying generators; lower wins
    pub rank: i64,
    /// Spawn table, block types unique
    pub blocks: Vec<OreBlock>,
    /// Fallback generator flag
    pub is_default: bool,
}

impl GeneratorDefinition {
    /// Create an unranked, ungated generator with no blocks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            item: None,
            symbol: None,
            island_level: 0,
            rank: UNRANKED,
            blocks: Vec::new(),
            is_default: false,
        }
    }

    /// The synthesized fallback used when a catalog has no default
    pub fn synthesized_default() -> Self {
        Self::new(DEFAULT_GENERATOR_NAME).as_default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_island_level(mut self, island_level: i64) -> Self {
        self.island_level = island_level;
        self
    }

    pub fn with_block(mut self, block: impl Into<String>, chance: f64) -> Self {
        self.blocks.push(OreBlock::new(block, chance));
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Permission capability key gating this generator
    pub fn permission(&self) -> String {
        format!("{}.{}", PERMISSION_PREFIX, self.name)
    }

    /// Check the definition can be stored and looked up
    ///
    /// Names become document path segments, so they may not be empty or contain dots.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if self.name.contains('.') {
            return Err("name cannot contain '.'".to_string());
        }
        if self.island_level < 0 {
            return Err(format!(
                "island level must be non-negative, got {}",
                self.island_level
            ));
        }

        let mut seen = HashSet::new();
        for block in &self.blocks {
            if block.block.is_empty() || block.block.contains('.') {
                return Err(format!("invalid block type '{}'", block.block));
            }
            if !seen.insert(block.block.as_str()) {
                return Err(format!("duplicate block type '{}'", block.block));
            }
            if !(0.0..=1.0).contains(&block.chance) {
                return Err(format!(
                    "chance for '{}' must be within [0, 1], got {}",
                    block.block, block.chance
                ));
            }
        }
        Ok(())
    }
}
