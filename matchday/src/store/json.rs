// Single-file JSON backend.
//
// The file holds the interchange shape directly:
// {"teams": {"1": "Team 1", ...}, "matches": [{"id": 0, "t1": "1", ...}]}

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{StorageBackend, StoreError};
use crate::league::state::LeagueState;

/// Stores the league as one pretty-printed JSON document.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn read(&self) -> Result<Option<LeagueState>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        read_league_file(&self.path).map(Some)
    }

    fn write(&self, state: &LeagueState) -> Result<(), StoreError> {
        write_league_file(&self.path, state)
    }

    fn destroy(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Parse a league JSON file.
pub(crate) fn read_league_file(path: &Path) -> Result<LeagueState, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a league JSON file (4-space indent), creating parent directories.
pub(crate) fn write_league_file(path: &Path, state: &LeagueState) -> Result<(), StoreError> {
    let io_err = |e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    state.serialize(&mut ser).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::write(path, buf).map_err(io_err)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
