// League domain: teams, matches, the working league state, the mutation and
// undo engine, and the standings table.

pub mod matches;
pub mod mutation;
pub mod standings;
pub mod state;
pub mod team;

use thiserror::Error;

use crate::store::StoreError;
use matches::MatchId;
use team::TeamId;

/// Errors raised by league operations.
///
/// Missing identifiers on the mutation and delete paths are not errors (those
/// report an outcome value instead); a failed rename is, so the caller can
/// tell the user nothing changed.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("invalid value for `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl LeagueError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        LeagueError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
