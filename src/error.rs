//! Error types for the ore generator resolution system.

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse document {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Sled backend error: {0}")]
    Backend(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::Serialize(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialize(err.to_string())
    }
}

/// Errors surfaced by the catalog, resolver and service layer
#[derive(Debug, Error)]
pub enum OregenError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[source] StoreError),

    #[error("Failed to persist: {0}")]
    Persist(#[source] StoreError),

    #[error("Invalid generator '{name}': {reason}")]
    InvalidGenerator { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for OregenError {
    fn from(err: config::ConfigError) -> Self {
        OregenError::Config(err.to_string())
    }
}
