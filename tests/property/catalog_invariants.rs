//! Property-based tests for catalog normalization, the document codec and selection

use oregen::document::Document;
use oregen::generator::codec;
use oregen::resolver::{select_generator, should_persist};
use oregen::{CatalogState, GeneratorDefinition, OreBlock};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

fn definition_strategy() -> impl Strategy<Value = GeneratorDefinition> {
    (
        "[a-z][a-z0-9_]{0,7}",
        proptest::option::of("[A-Za-z ]{1,12}"),
        -3i64..20,
        0i64..100,
        proptest::collection::btree_map("[A-Z][A-Z_]{0,9}", 0u32..=100, 0..4),
        any::<bool>(),
    )
        .prop_map(|(name, label, rank, island_level, blocks, is_default)| {
            let blocks: BTreeMap<String, u32> = blocks;
            GeneratorDefinition {
                name,
                label,
                item: None,
                symbol: None,
                island_level,
                rank,
                blocks: blocks
                    .into_iter()
                    .map(|(block, percent)| OreBlock::new(block, percent as f64 / 100.0))
                    .collect(),
                is_default,
            }
        })
}

fn unique_by_name(definitions: Vec<GeneratorDefinition>) -> Vec<GeneratorDefinition> {
    let mut seen = std::collections::HashSet::new();
    definitions
        .into_iter()
        .filter(|d| seen.insert(d.name.clone()))
        .collect()
}

/// Whatever the flags say, a built state has exactly one default and it is listed
#[test]
fn test_exactly_one_default_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &proptest::collection::vec(definition_strategy(), 0..8),
            |definitions| {
                let flagged_first = definitions.iter().find(|d| d.is_default).map(|d| d.name.clone());
                let state = CatalogState::new(
                    definitions.into_iter().map(Arc::new).collect(),
                    Vec::new(),
                    false,
                );

                let defaults: Vec<_> = state.generators().iter().filter(|g| g.is_default).collect();
                prop_assert_eq!(defaults.len(), 1);
                prop_assert_eq!(&defaults[0].name, &state.default_generator().name);
                if let Some(name) = flagged_first {
                    prop_assert_eq!(&state.default_generator().name, &name);
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Writing generators to a document and reading them back loses nothing
#[test]
fn test_codec_preserves_generators_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &proptest::collection::vec(definition_strategy(), 0..6),
            |definitions| {
                let definitions: Vec<GeneratorDefinition> = unique_by_name(definitions)
                    .into_iter()
                    .map(|mut d| {
                        d.is_default = d.name == "default";
                        d
                    })
                    .collect();

                let mut doc = Document::new(Path::new("generators.toml"));
                codec::write_generators(&mut doc, &definitions.iter().collect::<Vec<_>>()).unwrap();
                let text = toml::to_string_pretty(doc.section("").unwrap()).unwrap();
                let reparsed = Document::parse(Path::new("generators.toml"), &text).unwrap();

                prop_assert_eq!(codec::read_generators(&reparsed).unwrap(), definitions);
                Ok(())
            },
        )
        .unwrap();
}

/// Selection always yields a listed, qualifying generator that no other candidate outranks
#[test]
fn test_selection_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                proptest::collection::vec(definition_strategy(), 1..8),
                proptest::collection::vec(any::<bool>(), 8),
                0i64..100,
            ),
            |(definitions, grants, island_level)| {
                let state = CatalogState::new(
                    unique_by_name(definitions).into_iter().map(Arc::new).collect(),
                    Vec::new(),
                    false,
                );
                let permitted = |permission: &str| {
                    state
                        .generators()
                        .iter()
                        .position(|g| g.permission() == permission)
                        .map(|i| grants[i % grants.len()])
                        .unwrap_or(false)
                };

                let selected = select_generator(&state, permitted, island_level);
                prop_assert!(state.generators().iter().any(|g| Arc::ptr_eq(g, &selected)));

                let qualifies = |g: &GeneratorDefinition| {
                    (g.rank > 0 && permitted(&g.permission()) && island_level >= g.island_level)
                        || g.is_default
                };
                prop_assert!(qualifies(&selected));
                let best = state
                    .generators()
                    .iter()
                    .filter(|g| qualifies(g))
                    .map(|g| (g.rank <= 0, g.rank))
                    .min();
                prop_assert_eq!(best, Some((selected.rank <= 0, selected.rank)));
                Ok(())
            },
        )
        .unwrap();
}

/// A player without a record never gets the default written, and equal names never write
#[test]
fn test_should_persist_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(definition_strategy(), proptest::option::of("[a-z]{1,6}")),
            |(selected, persisted)| {
                let write = should_persist(&selected, persisted.as_deref());
                if persisted.as_deref() == Some(selected.name.as_str()) {
                    prop_assert!(!write);
                } else if persisted.is_none() {
                    prop_assert_eq!(write, !selected.is_default);
                } else {
                    prop_assert!(write);
                }
                Ok(())
            },
        )
        .unwrap();
}
