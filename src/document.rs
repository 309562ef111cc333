//! Hierarchical document store
//!
//! A TOML file held in memory as a table tree and addressed by dotted paths
//! (`generators.iron.rank`). Reads are lenient and fall back to caller supplied
//! defaults; writes create intermediate tables as needed. Nothing touches disk
//! until `save` is called.

use crate::error::StoreError;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// TOML-backed key-value document
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    root: Table,
}

impl Document {
    /// Create an empty document bound to `path` without reading it
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            root: Table::new(),
        }
    }

    /// Create a document and load it from disk if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut doc = Self::new(path);
        doc.load()?;
        Ok(doc)
    }

    /// Build a document from already-parsed TOML text (not bound to a real file)
    pub fn parse(path: &Path, content: &str) -> Result<Self, StoreError> {
        let root = parse_table(path, content)?;
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// File this document reads from and writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory tree with the file contents.
    ///
    /// A missing file loads as an empty document. On error the current tree is kept.
    pub fn load(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            self.root = Table::new();
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)?;
        self.root = parse_table(&self.path, &content)?;
        Ok(())
    }

    /// Write the whole tree back to disk, creating the parent directory if needed
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(&self.root)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn get_int(&self, path: &str, default: i64) -> i64 {
        self.get(path).and_then(Value::as_integer).unwrap_or(default)
    }

    /// Floats accept integer values too (`chance = 1` reads as `1.0`)
    pub fn get_float(&self, path: &str, default: f64) -> f64 {
        match self.get(path) {
            Some(Value::Float(f)) => *f,
            Some(Value::Integer(i)) => *i as f64,
            _ => default,
        }
    }

    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(Value::as_str).map(str::to_string)
    }

    /// String entries of a list; non-string items are skipped
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sub-table at `path`, or the root table for an empty path
    pub fn section(&self, path: &str) -> Option<&Table> {
        if path.is_empty() {
            return Some(&self.root);
        }
        self.get(path).and_then(Value::as_table)
    }

    /// Direct child keys of a section, in document order
    pub fn keys(&self, path: &str) -> Vec<String> {
        self.section(path)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Set a value, replacing any non-table value found along the way
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let segments = split_path(path)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| StoreError::InvalidPath(path.to_string()))?;

        let mut current = &mut self.root;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            if !entry.is_table() {
                *entry = Value::Table(Table::new());
            }
            current = match entry {
                Value::Table(table) => table,
                _ => return Err(StoreError::InvalidPath(path.to_string())),
            };
        }
        current.insert(last.to_string(), value.into());
        Ok(())
    }

    /// Remove the value at `path`, returning it if present
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let segments = split_path(path).ok()?;
        let (last, parents) = segments.split_last()?;

        let mut current = &mut self.root;
        for segment in parents {
            current = current.get_mut(*segment)?.as_table_mut()?;
        }
        current.remove(*last)
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, StoreError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

fn parse_table(path: &Path, content: &str) -> Result<Table, StoreError> {
    toml::from_str::<Table>(content).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
