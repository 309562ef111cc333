//! Configuration file sources, lowest precedence first.

pub mod data_dir_file;
pub mod global_file;
