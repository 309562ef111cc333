//! Reading and writing generators in the configuration document.
//!
//! Layout:
//!
//! ```toml
//! debug = false
//! disabledWorlds = ["world_nether"]
//!
//! [generators.iron]
//! item = "IRON_PICKAXE"
//! label = "Iron"
//! islandLevel = 10
//! rank = 5
//!
//! [generators.iron.blocks]
//! COBBLESTONE = 0.8
//! IRON_ORE = 0.2
//! ```

use super::{GeneratorDefinition, OreBlock, DEFAULT_GENERATOR_NAME, UNRANKED};
use crate::document::Document;
use crate::error::StoreError;
use std::ops::Deref;
use toml::{Table, Value};

pub const KEY_GENERATORS: &str = "generators";
pub const KEY_DISABLED_WORLDS: &str = "disabledWorlds";
pub const KEY_DEBUG: &str = "debug";

/// Read every generator in document order.
///
/// A generator named `default` is always flagged default. A `generators` key that is
/// not a table, or an entry that is not a table, is rejected as malformed.
pub fn read_generators(doc: &Document) -> Result<Vec<GeneratorDefinition>, StoreError> {
    let Some(value) = doc.get(KEY_GENERATORS) else {
        return Ok(Vec::new());
    };
    let section = value
        .as_table()
        .ok_or_else(|| malformed(doc, "'generators' must be a table"))?;

    let mut generators = Vec::with_capacity(section.len());
    for (name, entry) in section {
        let entry = entry
            .as_table()
            .ok_or_else(|| malformed(doc, &format!("generator '{}' must be a table", name)))?;
        generators.push(read_generator(name, entry));
    }
    Ok(generators)
}

fn read_generator(name: &str, entry: &Table) -> GeneratorDefinition {
    let string = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
    let int = |key: &str, default: i64| entry.get(key).and_then(Value::as_integer).unwrap_or(default);

    let blocks = entry
        .get("blocks")
        .and_then(Value::as_table)
        .map(|blocks| {
            blocks
                .iter()
                .map(|(block, chance)| OreBlock::new(block.clone(), as_chance(chance)))
                .collect()
        })
        .unwrap_or_default();

    let flagged = entry.get("default").and_then(Value::as_bool).unwrap_or(false);

    GeneratorDefinition {
        name: name.to_string(),
        label: string("label"),
        item: string("item"),
        symbol: string("symbol"),
        island_level: int("islandLevel", 0),
        rank: int("rank", UNRANKED),
        blocks,
        is_default: flagged || name == DEFAULT_GENERATOR_NAME,
    }
}

fn as_chance(value: &Value) -> f64 {
    match value {
        Value::Float(f) => *f,
        Value::Integer(i) => *i as f64,
        _ => 0.0,
    }
}

/// Replace the `generators` section with `generators`. Does not save.
///
/// Entries are keyed by the raw generator and block names, so a name loaded from a
/// quoted key (`[generators."tier.one"]`) is written back under the same key. The
/// `default` key is only written for a default generator not already named `default`,
/// since that name implies the flag on read.
pub fn write_generators<G>(doc: &mut Document, generators: &[G]) -> Result<(), StoreError>
where
    G: Deref<Target = GeneratorDefinition>,
{
    let mut section = Table::new();
    for generator in generators {
        section.insert(generator.name.clone(), Value::Table(generator_table(generator)));
    }
    doc.remove(KEY_GENERATORS);
    doc.set(KEY_GENERATORS, Value::Table(section))
}

fn generator_table(generator: &GeneratorDefinition) -> Table {
    let mut entry = Table::new();
    if let Some(item) = &generator.item {
        entry.insert("item".to_string(), Value::from(item.as_str()));
    }
    if let Some(label) = &generator.label {
        entry.insert("label".to_string(), Value::from(label.as_str()));
    }
    if let Some(symbol) = &generator.symbol {
        entry.insert("symbol".to_string(), Value::from(symbol.as_str()));
    }
    entry.insert("islandLevel".to_string(), Value::Integer(generator.island_level));
    entry.insert("rank".to_string(), Value::Integer(generator.rank));
    if generator.is_default && generator.name != DEFAULT_GENERATOR_NAME {
        entry.insert("default".to_string(), Value::Boolean(true));
    }

    let blocks: Table = generator
        .blocks
        .iter()
        .map(|block| (block.block.clone(), Value::Float(block.chance)))
        .collect();
    entry.insert("blocks".to_string(), Value::Table(blocks));
    entry
}

pub fn read_disabled_worlds(doc: &Document) -> Vec<String> {
    doc.get_string_list(KEY_DISABLED_WORLDS)
}

pub fn write_disabled_worlds(doc: &mut Document, worlds: &[String]) -> Result<(), StoreError> {
    doc.set(KEY_DISABLED_WORLDS, worlds.to_vec())
}

pub fn read_debug(doc: &Document) -> bool {
    doc.get_bool(KEY_DEBUG, false)
}

fn malformed(doc: &Document, message: &str) -> StoreError {
    StoreError::Parse {
        path: doc.path().display().to_string(),
        message: message.to_string(),
    }
}
