//! Merge rules for layered configuration sources.

pub mod merge_policy;
