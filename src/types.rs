//! Core identifiers shared across the crate.

/// Stable player identity as issued by the host server
pub type PlayerId = uuid::Uuid;
