// SQLite backend for the league store.
//
// Tables use relational column names (`t1_id`, `goals_1`, `is_done`, ...);
// rows are translated to and from the interchange `Match` here and nowhere
// else. A `league_meta` row marks that a league has been written, so an
// empty league and "never saved" can be told apart.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};

use super::{StorageBackend, StoreError};
use crate::league::matches::{Match, MatchId};
use crate::league::state::LeagueState;
use crate::league::team::{Team, TeamId};

/// Wrap a rusqlite error with a short description of what failed.
fn db_err(context: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |source| StoreError::Database { context, source }
}

/// SQLite-backed league storage.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Key in `league_meta` recording that a league has been saved.
    const SAVED_KEY: &'static str = "saved_at";

    /// Open (or create) a database at `path` and ensure all tables exist.
    /// Pass `":memory:"` for an ephemeral database (useful for tests).
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(db_err("failed to open league database"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(db_err("failed to set database pragmas"))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS teams (
                id       INTEGER PRIMARY KEY,
                name     TEXT NOT NULL,
                position INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS matches (
                id       INTEGER PRIMARY KEY,
                round    INTEGER NOT NULL,
                t1_id    INTEGER NOT NULL,
                t2_id    INTEGER NOT NULL,
                goals_1  INTEGER NOT NULL DEFAULT 0,
                goals_2  INTEGER NOT NULL DEFAULT 0,
                fouls_1  INTEGER NOT NULL DEFAULT 0,
                fouls_2  INTEGER NOT NULL DEFAULT 0,
                is_done  INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS league_meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .map_err(db_err("failed to create league schema"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    fn has_saved_league(conn: &Connection) -> Result<bool, StoreError> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM league_meta WHERE key = ?1)",
            params![Self::SAVED_KEY],
            |row| row.get(0),
        )
        .map_err(db_err("failed to check for saved league"))
    }

    fn load_teams(conn: &Connection) -> Result<Vec<Team>, StoreError> {
        let mut stmt = conn
            .prepare("SELECT id, name FROM teams ORDER BY position")
            .map_err(db_err("failed to prepare team query"))?;
        let teams = stmt
            .query_map([], |row| {
                Ok(Team {
                    id: TeamId::new(row.get(0)?),
                    name: row.get(1)?,
                })
            })
            .map_err(db_err("failed to query teams"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err("failed to map team rows"))?;
        Ok(teams)
    }

    fn load_matches(conn: &Connection) -> Result<Vec<Match>, StoreError> {
        let mut stmt = conn
            .prepare(
                "SELECT id, round, t1_id, t2_id, goals_1, goals_2, fouls_1, fouls_2, is_done
                 FROM matches ORDER BY position",
            )
            .map_err(db_err("failed to prepare match query"))?;
        let matches = stmt
            .query_map([], |row| {
                Ok(Match {
                    id: MatchId::new(row.get(0)?),
                    round: row.get(1)?,
                    t1: TeamId::new(row.get(2)?),
                    t2: TeamId::new(row.get(3)?),
                    g1: row.get(4)?,
                    g2: row.get(5)?,
                    f1: row.get(6)?,
                    f2: row.get(7)?,
                    done: row.get(8)?,
                })
            })
            .map_err(db_err("failed to query matches"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err("failed to map match rows"))?;
        Ok(matches)
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn read(&self) -> Result<Option<LeagueState>, StoreError> {
        let conn = self.conn();
        if !Self::has_saved_league(&conn)? {
            return Ok(None);
        }
        let teams = Self::load_teams(&conn)?;
        let matches = Self::load_matches(&conn)?;
        LeagueState::new(teams, matches)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    /// Replace every row in one transaction, with automatic rollback on
    /// error.
    fn write(&self, state: &LeagueState) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .map_err(db_err("failed to begin save transaction"))?;

        tx.execute("DELETE FROM teams", [])
            .map_err(db_err("failed to clear teams"))?;
        tx.execute("DELETE FROM matches", [])
            .map_err(db_err("failed to clear matches"))?;

        {
            let mut insert_team = tx
                .prepare("INSERT INTO teams (id, name, position) VALUES (?1, ?2, ?3)")
                .map_err(db_err("failed to prepare team insert"))?;
            for (position, team) in state.teams().iter().enumerate() {
                insert_team
                    .execute(params![team.id.get(), team.name, position as i64])
                    .map_err(db_err("failed to insert team"))?;
            }

            let mut insert_match = tx
                .prepare(
                    "INSERT INTO matches
                        (id, round, t1_id, t2_id, goals_1, goals_2, fouls_1, fouls_2, is_done, position)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )
                .map_err(db_err("failed to prepare match insert"))?;
            for (position, m) in state.matches().iter().enumerate() {
                insert_match
                    .execute(params![
                        m.id.get(),
                        m.round,
                        m.t1.get(),
                        m.t2.get(),
                        m.g1,
                        m.g2,
                        m.f1,
                        m.f2,
                        m.done,
                        position as i64,
                    ])
                    .map_err(db_err("failed to insert match"))?;
            }
        }

        let saved_at = chrono::Utc::now().to_rfc3339();
        tx.execute(
            "INSERT OR REPLACE INTO league_meta (key, value) VALUES (?1, ?2)",
            params![Self::SAVED_KEY, saved_at],
        )
        .map_err(db_err("failed to record save time"))?;

        tx.commit().map_err(db_err("failed to commit save"))?;
        Ok(())
    }

    fn destroy(&self) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .map_err(db_err("failed to begin reset transaction"))?;
        tx.execute("DELETE FROM matches", [])
            .map_err(db_err("failed to delete matches"))?;
        tx.execute("DELETE FROM teams", [])
            .map_err(db_err("failed to delete teams"))?;
        tx.execute("DELETE FROM league_meta", [])
            .map_err(db_err("failed to delete league metadata"))?;
        tx.commit().map_err(db_err("failed to commit reset"))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
