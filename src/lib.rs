//! Oregen: Ore Generator Resolution
//!
//! Decides which ore generator profile applies to a player from rank, permission and
//! island level, caches the decision for a short TTL and keeps a durable record of
//! each player's assignment.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod logging;
pub mod player;
pub mod provider;
pub mod resolver;
pub mod types;

pub use api::GeneratorService;
pub use catalog::{CatalogState, GeneratorCatalog};
pub use error::{OregenError, StoreError};
pub use generator::{GeneratorDefinition, OreBlock};
pub use resolver::GeneratorResolver;
pub use types::PlayerId;
