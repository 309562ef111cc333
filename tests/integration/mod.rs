//! Integration tests for generator resolution, the catalog and the player stores

mod player_stores;
mod test_utils;
