//! Durable fixture slots.
//!
//! A slot is one small file under the data directory holding the id of the
//! last resource created during one-time setup. Slots outlive the run and are
//! overwritten, never cleared, by the next one.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use crate::config::FixtureScope;
use crate::error::FixtureError;

/// Resource kinds that have a fixture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    Location,
    Place,
}

impl FixtureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureKind::Location => "location",
            FixtureKind::Place => "place",
        }
    }

    /// Slot name for this kind as written by `suite` under `scope`.
    pub fn key(&self, scope: FixtureScope, suite: &str) -> String {
        match scope {
            FixtureScope::Shared => self.as_str().to_string(),
            FixtureScope::Isolated => format!("{}/{}", suite, self.as_str()),
        }
    }
}

impl std::fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps read errors to fixture errors, reporting missing files as `NotFound`.
fn classify_read_error(error: std::io::Error, key: &str) -> FixtureError {
    match error.kind() {
        ErrorKind::NotFound => FixtureError::NotFound {
            key: key.to_string(),
        },
        _ => io_error(error, key, "Failed to read"),
    }
}

fn io_error(error: std::io::Error, key: &str, context: &str) -> FixtureError {
    FixtureError::Io(format!("{} '{}': {}", context, key, error))
}

/// File-backed fixture slots rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persists `value` under `key`, replacing any previous value.
    ///
    /// The value is written to a temporary sibling, synced, then renamed
    /// over the slot so readers never observe a partial write.
    pub fn set(&self, key: &str, value: &str) -> Result<(), FixtureError> {
        let path = self.slot_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| FixtureError::Io(format!("Failed to create {:?}: {}", parent, e)))?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)
            .map_err(|e| io_error(e, key, "Failed to create temp file for"))?;
        file.write_all(value.as_bytes())
            .map_err(|e| io_error(e, key, "Failed to write"))?;
        file.sync_all()
            .map_err(|e| io_error(e, key, "Failed to sync"))?;

        fs::rename(&temp_path, &path).map_err(|e| io_error(e, key, "Failed to rename"))?;

        tracing::debug!("Recorded fixture {} = {}", key, value);
        Ok(())
    }

    /// Returns the most recently stored value for `key`.
    pub fn get(&self, key: &str) -> Result<String, FixtureError> {
        let path = self.slot_path(key)?;
        let contents =
            fs::read_to_string(&path).map_err(|e| classify_read_error(e, key))?;

        let value = contents.trim();
        if value.is_empty() {
            return Err(FixtureError::NotFound {
                key: key.to_string(),
            });
        }
        Ok(value.to_string())
    }

    /// Stores a resource id.
    pub fn set_id(&self, key: &str, id: i64) -> Result<(), FixtureError> {
        self.set(key, &id.to_string())
    }

    /// Reads a resource id.
    pub fn get_id(&self, key: &str) -> Result<i64, FixtureError> {
        let value = self.get(key)?;
        value.parse().map_err(|_| FixtureError::Corrupt {
            key: key.to_string(),
            value,
        })
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, FixtureError> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && !key.split('/').any(str::is_empty)
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(FixtureError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}
