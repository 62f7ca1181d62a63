// Messages exchanged between the session controller and the TUI.

use crate::league::matches::{MatchId, Side};
use crate::league::mutation::StatKind;
use crate::league::standings::StandingsRow;
use crate::league::state::LeagueState;
use crate::league::team::TeamId;

/// Main panel tabs, mirroring the three pages of the league screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabId {
    #[default]
    Matches,
    Standings,
    Setup,
}

/// Commands sent from the TUI to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Add or remove a goal/foul for one side of a match.
    ApplyDelta {
        match_id: MatchId,
        stat: StatKind,
        delta: i32,
        side: Side,
    },
    /// Revert the most recent match mutation.
    Undo,
    /// Persist the working league.
    Save,
    AddMatch {
        round: u32,
        home: TeamId,
        away: TeamId,
    },
    DeleteMatch(MatchId),
    AddTeam(String),
    RenameTeam {
        team_id: TeamId,
        name: String,
    },
    /// Destroy stored data and start over with the default roster.
    ResetLeague,
    ExportBackup,
    RestoreLatestBackup,
    ExportStandings,
    Quit,
}

/// Severity of a notice shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Short message for the user, e.g. "Saved" or a penalty announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the TUI needs to redraw after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub league_name: String,
    pub league: LeagueState,
    pub standings: Vec<StandingsRow>,
    /// Round suggested for the next new match.
    pub next_round: u32,
    pub undo_depth: usize,
    /// Whether the working league has changes not yet saved.
    pub dirty: bool,
    pub backend: &'static str,
}

/// Updates pushed from the session controller to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    Notice(Notice),
}
