// Session controller and orchestration loop.
//
// Owns the working copy of the league, the undo history and the store.
// Receives user commands from the TUI, applies them through the league
// engines, and pushes state snapshots and notices back to the TUI.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::league::matches::{MatchId, Side};
use crate::league::mutation::{self, MutationOutcome, StatKind, UndoHistory};
use crate::league::standings;
use crate::league::state::LeagueState;
use crate::league::LeagueError;
use crate::protocol::{AppSnapshot, Notice, UiUpdate, UserCommand};
use crate::store::{backup, LeagueStore};

/// File the standings table is exported to, relative to the working dir.
pub const STANDINGS_CSV: &str = "standings.csv";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete session state.
pub struct AppState {
    pub config: Config,
    pub store: LeagueStore,
    /// Working copy of the league. Match edits live here until saved.
    pub league: LeagueState,
    /// Snapshots of matches taken before each edit, newest last.
    pub history: UndoHistory,
    /// Whether `league` has changes not yet written to the store.
    pub dirty: bool,
}

impl AppState {
    /// Create a session by loading the stored league (or the default one).
    pub fn new(config: Config, store: LeagueStore) -> Self {
        let league = store.load();
        AppState {
            config,
            store,
            league,
            history: UndoHistory::new(),
            dirty: false,
        }
    }

    /// Build a full snapshot for the TUI.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            league_name: self.config.league.name.clone(),
            league: self.league.clone(),
            standings: standings::compute(&self.league),
            next_round: self.league.next_round(),
            undo_depth: self.history.len(),
            dirty: self.dirty,
            backend: self.store.backend_name(),
        }
    }

    /// Apply one user command. Returns a notice for the user, if any.
    ///
    /// `Quit` is handled by the event loop and is a no-op here.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Option<Notice> {
        match cmd {
            UserCommand::ApplyDelta {
                match_id,
                stat,
                delta,
                side,
            } => self.apply_delta(match_id, stat, delta, side),
            UserCommand::Undo => self.undo(),
            UserCommand::Save => Some(self.save()),
            UserCommand::AddMatch { round, home, away } => {
                match self.store.add_match(&mut self.league, round, home, away) {
                    Ok(id) => {
                        self.dirty = false;
                        Some(Notice::info(format!("Added match {id} (round {round})")))
                    }
                    Err(e) => Some(self.store_failure("Could not add match", e)),
                }
            }
            UserCommand::DeleteMatch(match_id) => {
                match self.store.delete_match(&mut self.league, match_id) {
                    Ok(true) => {
                        self.dirty = false;
                        Some(Notice::info("Match deleted"))
                    }
                    Ok(false) => None,
                    Err(e) => Some(self.store_failure("Could not delete match", e)),
                }
            }
            UserCommand::AddTeam(name) => match self.store.add_team(&mut self.league, &name) {
                Ok(id) => {
                    self.dirty = false;
                    Some(Notice::info(format!("Added team {} ({id})", name.trim())))
                }
                Err(e) => Some(self.store_failure("Could not add team", e)),
            },
            UserCommand::RenameTeam { team_id, name } => {
                match self.store.rename_team(&mut self.league, team_id, &name) {
                    Ok(()) => {
                        self.dirty = false;
                        Some(Notice::info("Team name updated"))
                    }
                    Err(e) => Some(self.store_failure("Could not rename team", e)),
                }
            }
            UserCommand::ResetLeague => match self.store.reset() {
                Ok(fresh) => {
                    self.league = fresh;
                    self.history.clear();
                    self.dirty = false;
                    Some(Notice::warning("League reset"))
                }
                Err(e) => Some(Notice::error(format!("Reset failed: {e}"))),
            },
            UserCommand::ExportBackup => Some(self.export_backup()),
            UserCommand::RestoreLatestBackup => Some(self.restore_latest_backup()),
            UserCommand::ExportStandings => Some(self.export_standings(PathBuf::from(STANDINGS_CSV))),
            UserCommand::Quit => None,
        }
    }

    fn apply_delta(
        &mut self,
        match_id: MatchId,
        stat: StatKind,
        delta: i32,
        side: Side,
    ) -> Option<Notice> {
        let outcome = mutation::apply_delta(
            &mut self.league,
            &mut self.history,
            match_id,
            stat,
            delta,
            side,
        );
        match outcome {
            MutationOutcome::NotFound => {
                debug!("Stale match reference {} ignored", match_id);
                None
            }
            MutationOutcome::Applied { penalty } => {
                self.dirty = true;
                let awarded = penalty?;
                let team_id = self.league.get_match(match_id)?.team(awarded);
                let team = self
                    .league
                    .team_name(team_id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("team {team_id}"));
                info!("Penalty goal in match {} for {}", match_id, team);
                Some(Notice::warning(format!("3 fouls! Penalty goal for {team}")))
            }
        }
    }

    /// A failed write leaves the edited working copy unsaved.
    fn store_failure(&mut self, what: &str, e: LeagueError) -> Notice {
        if matches!(e, LeagueError::Storage(_)) {
            error!("{}: {}", what, e);
            self.dirty = true;
        }
        Notice::error(format!("{what}: {e}"))
    }

    fn undo(&mut self) -> Option<Notice> {
        let restored = self.history.undo(&mut self.league)?;
        self.dirty = true;
        Some(Notice::info(format!("Undid last change to match {restored}")))
    }

    /// Persist the working league.
    pub fn save(&mut self) -> Notice {
        match self.store.save(&self.league) {
            Ok(()) => {
                self.dirty = false;
                Notice::info("Saved successfully")
            }
            Err(e) => {
                error!("Save failed: {}", e);
                Notice::error(format!("Save failed: {e}"))
            }
        }
    }

    /// Save if there are unsaved changes. Returns a notice only on failure.
    pub fn autosave(&mut self) -> Option<Notice> {
        if !self.dirty {
            return None;
        }
        debug!("Autosaving league");
        let notice = self.save();
        self.dirty.then_some(notice)
    }

    fn export_backup(&self) -> Notice {
        let dir = self.config.storage.backup_dir();
        match backup::export(&self.league, &dir) {
            Ok(path) => Notice::info(format!("Backup written to {}", path.display())),
            Err(e) => Notice::error(format!("Backup failed: {e}")),
        }
    }

    fn restore_latest_backup(&mut self) -> Notice {
        let dir = self.config.storage.backup_dir();
        let path = match backup::latest(&dir) {
            Ok(Some(path)) => path,
            Ok(None) => return Notice::warning(format!("No backups in {}", dir.display())),
            Err(e) => return Notice::error(format!("Could not list backups: {e}")),
        };
        let snapshot = match backup::read(&path) {
            Ok(snapshot) => snapshot,
            Err(e) => return Notice::error(format!("Could not read backup: {e}")),
        };
        match self.store.restore_from_snapshot(&mut self.league, snapshot) {
            Ok(()) => {
                // Snapshots refer to matches of the replaced league.
                self.history.clear();
                self.dirty = false;
                Notice::info(format!("Restored {}", path.display()))
            }
            Err(e) => Notice::error(format!("Restore failed: {e}")),
        }
    }

    /// Write the current standings table as CSV to `path`.
    pub fn export_standings(&self, path: PathBuf) -> Notice {
        let rows = standings::compute(&self.league);
        let result = std::fs::File::create(&path)
            .map_err(|e| e.to_string())
            .and_then(|file| standings::write_csv(&rows, file).map_err(|e| e.to_string()));
        match result {
            Ok(()) => {
                info!("Exported standings to {}", path.display());
                Notice::info(format!("Standings exported to {}", path.display()))
            }
            Err(e) => Notice::error(format!("Standings export failed: {e}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the session event loop until `Quit` arrives or the command channel
/// closes.
///
/// Pushes a snapshot to the TUI at start-up and after every command, and
/// autosaves on the configured interval.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    send_snapshot(&state, &ui_tx).await;

    let autosave_every = state.config.session.autosave_interval();
    let autosave_enabled = autosave_every.is_some();
    let mut autosave_tick =
        tokio::time::interval(autosave_every.unwrap_or(Duration::from_secs(3600)));
    // The first tick completes immediately; consume it so the first
    // autosave happens after one full interval.
    autosave_tick.tick().await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        debug!("Handling command {:?}", cmd);
                        if let Some(notice) = state.handle_command(cmd) {
                            let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
                        }
                        send_snapshot(&state, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = autosave_tick.tick(), if autosave_enabled => {
                let was_dirty = state.dirty;
                if let Some(notice) = state.autosave() {
                    let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
                }
                if was_dirty {
                    send_snapshot(&state, &ui_tx).await;
                }
            }
        }
    }

    if state.dirty {
        warn!("Exiting with unsaved match changes");
    }
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StorageConfig, StorageKind};
    use crate::league::team::TeamId;
    use crate::protocol::NoticeLevel;
    use crate::store::sqlite::SqliteBackend;
    use crate::store::DefaultRoster;

    /// Helper: a session over an in-memory SQLite store with the default
    /// six-team roster.
    fn test_app() -> AppState {
        let backend = SqliteBackend::open(":memory:").unwrap();
        let store = LeagueStore::new(Box::new(backend), DefaultRoster::default());
        let config = Config {
            storage: StorageConfig {
                backend: StorageKind::Sqlite,
                ..StorageConfig::default()
            },
            ..Config::default()
        };
        AppState::new(config, store)
    }

    fn add_match(app: &mut AppState, home: u32, away: u32) -> MatchId {
        app.handle_command(UserCommand::AddMatch {
            round: 1,
            home: TeamId::new(home),
            away: TeamId::new(away),
        });
        app.league.matches().last().unwrap().id
    }

    fn delta(match_id: MatchId, stat: StatKind, delta: i32, side: Side) -> UserCommand {
        UserCommand::ApplyDelta {
            match_id,
            stat,
            delta,
            side,
        }
    }

    #[test]
    fn new_session_starts_with_default_league() {
        let app = test_app();
        assert_eq!(app.league.teams().len(), 6);
        assert!(app.history.is_empty());
        assert!(!app.dirty);
    }

    #[test]
    fn goal_marks_dirty_and_save_clears() {
        let mut app = test_app();
        let id = add_match(&mut app, 1, 2);
        assert!(!app.dirty);

        app.handle_command(delta(id, StatKind::Goal, 1, Side::Home));
        assert!(app.dirty);
        assert_eq!(app.build_snapshot().standings[0].team, "Team 1");

        let notice = app.handle_command(UserCommand::Save).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(!app.dirty);
        assert_eq!(app.store.load(), app.league);
    }

    #[test]
    fn penalty_notice_names_the_credited_team() {
        let mut app = test_app();
        let id = add_match(&mut app, 1, 2);
        app.handle_command(delta(id, StatKind::Foul, 1, Side::Home));
        app.handle_command(delta(id, StatKind::Foul, 1, Side::Home));

        let notice = app
            .handle_command(delta(id, StatKind::Foul, 1, Side::Home))
            .unwrap();

        assert_eq!(notice.text, "3 fouls! Penalty goal for Team 2");
        assert_eq!(notice.level, NoticeLevel::Warning);
        let m = app.league.get_match(id).unwrap();
        assert_eq!((m.f1, m.g2), (0, 1));
    }

    #[test]
    fn stale_match_delta_is_silent() {
        let mut app = test_app();
        let notice = app.handle_command(delta(MatchId::new(77), StatKind::Goal, 1, Side::Away));
        assert!(notice.is_none());
        assert!(!app.dirty);
        assert!(app.history.is_empty());
    }

    #[test]
    fn undo_command_restores_previous_score() {
        let mut app = test_app();
        let id = add_match(&mut app, 3, 4);
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Away));
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Away));

        app.handle_command(UserCommand::Undo);
        assert_eq!(app.league.get_match(id).unwrap().g2, 1);
        assert_eq!(app.history.len(), 1);

        app.handle_command(UserCommand::Undo);
        assert_eq!(app.league.get_match(id).unwrap().g2, 0);
        assert!(app.handle_command(UserCommand::Undo).is_none());
    }

    #[test]
    fn undo_after_delete_and_re_add_leaves_new_match_alone() {
        let mut app = test_app();
        let old = add_match(&mut app, 1, 2);
        app.handle_command(delta(old, StatKind::Goal, 1, Side::Home));
        app.handle_command(UserCommand::DeleteMatch(old));

        app.handle_command(UserCommand::AddMatch {
            round: 2,
            home: TeamId::new(3),
            away: TeamId::new(4),
        });
        let fresh = app.league.matches().last().unwrap().id;
        assert_ne!(fresh, old);

        app.handle_command(UserCommand::Undo);

        let kept = app.league.get_match(fresh).unwrap();
        assert_eq!((kept.round, kept.t1, kept.t2), (2, TeamId::new(3), TeamId::new(4)));
        assert_eq!(app.league.get_match(old).unwrap().g1, 0);
        assert_eq!(app.league.matches().len(), 2);
    }

    #[test]
    fn rename_to_current_name_saves_pending_edits() {
        let mut app = test_app();
        let id = add_match(&mut app, 1, 2);
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Home));
        assert!(app.dirty);

        app.handle_command(UserCommand::RenameTeam {
            team_id: TeamId::new(1),
            name: "Team 1".into(),
        });

        assert!(!app.dirty);
        assert_eq!(app.store.load().get_match(id).unwrap().g1, 1);
    }

    #[test]
    fn same_team_match_is_rejected_with_error_notice() {
        let mut app = test_app();
        let notice = app
            .handle_command(UserCommand::AddMatch {
                round: 1,
                home: TeamId::new(2),
                away: TeamId::new(2),
            })
            .unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(app.league.matches().is_empty());
    }

    #[test]
    fn rename_unknown_team_reports_error() {
        let mut app = test_app();
        let notice = app
            .handle_command(UserCommand::RenameTeam {
                team_id: TeamId::new(40),
                name: "Nobody".into(),
            })
            .unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn reset_clears_matches_and_history() {
        let mut app = test_app();
        let id = add_match(&mut app, 1, 2);
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Home));
        app.handle_command(UserCommand::AddTeam("Extra".into()));

        app.handle_command(UserCommand::ResetLeague);

        assert!(app.league.matches().is_empty());
        assert_eq!(app.league.teams().len(), 6);
        assert!(app.history.is_empty());
        assert!(!app.dirty);
    }

    #[test]
    fn autosave_only_when_dirty() {
        let mut app = test_app();
        assert!(app.autosave().is_none());

        let id = add_match(&mut app, 1, 2);
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Home));
        assert!(app.autosave().is_none());
        assert!(!app.dirty);
        assert_eq!(app.store.load().get_match(id).unwrap().g1, 1);
    }

    #[test]
    fn backup_and_restore_round_trip() {
        let mut app = test_app();
        let dir = std::env::temp_dir().join(format!("matchday_app_backup_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        app.config.storage.backup_dir = Some(dir.to_string_lossy().into_owned());

        let id = add_match(&mut app, 1, 2);
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Home));
        let saved = app.league.clone();
        app.handle_command(UserCommand::ExportBackup);

        app.handle_command(UserCommand::DeleteMatch(id));
        assert!(app.league.matches().is_empty());

        let notice = app.handle_command(UserCommand::RestoreLatestBackup).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(app.league, saved);
        assert_eq!(app.store.load(), saved);
        assert!(app.history.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_standings_writes_csv() {
        let mut app = test_app();
        let id = add_match(&mut app, 1, 2);
        app.handle_command(delta(id, StatKind::Goal, 1, Side::Away));

        let path = std::env::temp_dir().join(format!("matchday_standings_{}.csv", std::process::id()));
        let notice = app.export_standings(path.clone());
        assert_eq!(notice.level, NoticeLevel::Info);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Team,PTS,GP,W,D,L,GD"));
        assert!(text.contains("Team 2,3,1,1,0,0,1"));
        let _ = std::fs::remove_file(&path);
    }
}
