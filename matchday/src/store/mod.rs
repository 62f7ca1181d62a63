// League store: durable copy of the league behind a pluggable backend.
//
// `LeagueStore` implements the league-level operations (add team, add match,
// restore, ...) on top of a `StorageBackend` that only knows how to read,
// overwrite and destroy a whole `LeagueState`. Backend-specific naming stays
// inside the backend.

pub mod backup;
pub mod json;
pub mod sqlite;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, StorageKind};
use crate::league::matches::{Match, MatchId};
use crate::league::state::LeagueState;
use crate::league::team::{Team, TeamId};
use crate::league::LeagueError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid league data in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        source: rusqlite::Error,
    },

    #[error("corrupt league data: {0}")]
    Corrupt(String),
}

// ---------------------------------------------------------------------------
// Backend contract
// ---------------------------------------------------------------------------

/// Durable medium holding one league.
pub trait StorageBackend: Send + Sync {
    /// Short backend label for logs.
    fn name(&self) -> &'static str;

    /// Read the stored league. `Ok(None)` means nothing has been stored yet.
    fn read(&self) -> Result<Option<LeagueState>, StoreError>;

    /// Overwrite the stored league with `state`. No merging.
    fn write(&self, state: &LeagueState) -> Result<(), StoreError>;

    /// Remove everything stored. A following `read` returns `Ok(None)`.
    fn destroy(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// LeagueStore
// ---------------------------------------------------------------------------

/// Team roster used whenever no durable league exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoster {
    pub team_count: usize,
    pub team_prefix: String,
}

impl Default for DefaultRoster {
    fn default() -> Self {
        DefaultRoster {
            team_count: 6,
            team_prefix: "Team".to_string(),
        }
    }
}

/// League operations over a storage backend.
///
/// Operations that take `&mut LeagueState` mutate the caller's working copy
/// and then persist the whole copy, so any unsaved match edits in it are
/// written too.
pub struct LeagueStore {
    backend: Box<dyn StorageBackend>,
    defaults: DefaultRoster,
}

impl LeagueStore {
    pub fn new(backend: Box<dyn StorageBackend>, defaults: DefaultRoster) -> Self {
        LeagueStore { backend, defaults }
    }

    /// Open the backend selected in the config.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let backend: Box<dyn StorageBackend> = match config.storage.backend {
            StorageKind::Json => Box::new(json::JsonFileBackend::new(&config.storage.json_path)),
            StorageKind::Sqlite => Box::new(sqlite::SqliteBackend::open(&config.storage.db_path)?),
        };
        let defaults = DefaultRoster {
            team_count: config.league.default_team_count,
            team_prefix: config.league.default_team_prefix.clone(),
        };
        info!("League store using {} backend", backend.name());
        Ok(LeagueStore::new(backend, defaults))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// A fresh league with the default roster and no matches.
    pub fn default_state(&self) -> LeagueState {
        LeagueState::with_default_roster(self.defaults.team_count, &self.defaults.team_prefix)
    }

    /// Current durable league. Missing or unreadable data falls back to the
    /// default league; the failure is logged, not returned.
    pub fn load(&self) -> LeagueState {
        match self.backend.read() {
            Ok(Some(state)) => {
                info!(
                    "Loaded league: {} teams, {} matches",
                    state.teams().len(),
                    state.matches().len()
                );
                state
            }
            Ok(None) => {
                info!("No stored league found, starting with default roster");
                self.default_state()
            }
            Err(e) => {
                warn!("Stored league unreadable, falling back to defaults: {}", e);
                self.default_state()
            }
        }
    }

    /// Persist the full league, replacing whatever was stored.
    pub fn save(&self, state: &LeagueState) -> Result<(), LeagueError> {
        self.backend.write(state)?;
        info!(
            "Saved league ({} teams, {} matches) via {}",
            state.teams().len(),
            state.matches().len(),
            self.backend.name()
        );
        Ok(())
    }

    /// Destroy all stored data and return a fresh default league.
    pub fn reset(&self) -> Result<LeagueState, LeagueError> {
        self.backend.destroy()?;
        warn!("League reset: stored data destroyed");
        Ok(self.default_state())
    }

    /// Append a team with the next free id and persist.
    pub fn add_team(&self, state: &mut LeagueState, name: &str) -> Result<TeamId, LeagueError> {
        let name = validate_team_name(name)?;
        let id = state.next_team_id();
        state.push_team(Team::new(id, name));
        info!("Added team {} ({})", id, name);
        self.save(state)?;
        Ok(id)
    }

    /// Rename a team in place and persist. Unknown ids are reported as
    /// `TeamNotFound` and nothing is written. An unchanged name still writes
    /// the working copy.
    pub fn rename_team(
        &self,
        state: &mut LeagueState,
        team_id: TeamId,
        new_name: &str,
    ) -> Result<(), LeagueError> {
        let new_name = validate_team_name(new_name)?;
        let team = state
            .team_mut(team_id)
            .ok_or(LeagueError::TeamNotFound(team_id))?;
        if team.name != new_name {
            info!("Renamed team {}: '{}' -> '{}'", team_id, team.name, new_name);
            team.name = new_name.to_string();
        }
        self.save(state)
    }

    /// Create an unplayed match with the next free id and persist.
    ///
    /// Team ids are not checked against the roster; a match must pair two
    /// different teams and use a positive round.
    pub fn add_match(
        &self,
        state: &mut LeagueState,
        round: u32,
        t1: TeamId,
        t2: TeamId,
    ) -> Result<MatchId, LeagueError> {
        if t1 == t2 {
            warn!("Rejected match: team {} cannot play itself", t1);
            return Err(LeagueError::invalid("teams", "home and away teams must differ"));
        }
        if round == 0 {
            return Err(LeagueError::invalid("round", "must be at least 1"));
        }
        let id = state.next_match_id();
        state.push_match(Match::new(id, round, t1, t2));
        info!("Added match {} (round {}): {} vs {}", id, round, t1, t2);
        self.save(state)?;
        Ok(id)
    }

    /// Remove a match and persist. Returns `false` (and writes nothing) when
    /// the id is unknown.
    pub fn delete_match(&self, state: &mut LeagueState, match_id: MatchId) -> Result<bool, LeagueError> {
        if state.remove_match(match_id).is_none() {
            return Ok(false);
        }
        info!("Deleted match {}", match_id);
        self.save(state)?;
        Ok(true)
    }

    /// Replace both the stored and the working league with `snapshot`,
    /// keeping its identifiers. The working copy is only replaced once the
    /// write succeeded.
    pub fn restore_from_snapshot(
        &self,
        state: &mut LeagueState,
        snapshot: LeagueState,
    ) -> Result<(), LeagueError> {
        self.backend.write(&snapshot)?;
        info!(
            "Restored league from snapshot: {} teams, {} matches",
            snapshot.teams().len(),
            snapshot.matches().len()
        );
        *state = snapshot;
        Ok(())
    }
}

fn validate_team_name(name: &str) -> Result<&str, LeagueError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeagueError::invalid("name", "team name must not be empty"));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
