// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the session
// controller, or into local ViewState changes (tab switching, selection,
// form editing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{DraftField, InputMode, MatchDraft, ViewState};
use crate::league::matches::Side;
use crate::league::mutation::StatKind;
use crate::protocol::{Notice, TabId, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// session controller. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; only act on Press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    match &view_state.mode {
        InputMode::Normal => handle_normal(key_event, view_state),
        InputMode::ConfirmQuit => handle_confirm_quit(key_event, view_state),
        InputMode::ConfirmReset => handle_confirm_reset(key_event, view_state),
        InputMode::TeamName { .. } => handle_team_name(key_event, view_state),
        InputMode::NewMatch(_) => handle_match_form(key_event, view_state),
    }
}

fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Matches;
            return None;
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Standings;
            return None;
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Setup;
            return None;
        }
        KeyCode::Tab => {
            view_state.active_tab = next_tab(view_state.active_tab);
            return None;
        }
        KeyCode::Char('q') => {
            view_state.mode = InputMode::ConfirmQuit;
            return None;
        }
        KeyCode::Char('s') => return Some(UserCommand::Save),
        KeyCode::Char('u') => return Some(UserCommand::Undo),
        KeyCode::Char('e') => return Some(UserCommand::ExportStandings),
        _ => {}
    }

    match view_state.active_tab {
        TabId::Matches => handle_matches_tab(key_event, view_state),
        TabId::Setup => handle_setup_tab(key_event, view_state),
        TabId::Standings => None,
    }
}

fn handle_matches_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected_match = view_state.selected_match.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.league.matches().len().saturating_sub(1);
            view_state.selected_match = (view_state.selected_match + 1).min(last);
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.selected_side = Side::Home;
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            view_state.selected_side = Side::Away;
            None
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('g') => {
            delta_command(view_state, StatKind::Goal, 1)
        }
        KeyCode::Char('-') | KeyCode::Char('G') => delta_command(view_state, StatKind::Goal, -1),
        KeyCode::Char('f') => delta_command(view_state, StatKind::Foul, 1),
        KeyCode::Char('F') => delta_command(view_state, StatKind::Foul, -1),
        KeyCode::Char('d') | KeyCode::Delete => view_state
            .selected_match()
            .map(|m| UserCommand::DeleteMatch(m.id)),
        KeyCode::Char('n') => {
            open_match_form(view_state);
            None
        }
        _ => None,
    }
}

fn handle_setup_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected_team = view_state.selected_team.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.league.teams().len().saturating_sub(1);
            view_state.selected_team = (view_state.selected_team + 1).min(last);
            None
        }
        KeyCode::Char('a') => {
            view_state.mode = InputMode::TeamName {
                renaming: None,
                buffer: String::new(),
            };
            None
        }
        KeyCode::Char('r') | KeyCode::Enter => {
            if let Some(team) = view_state.selected_team() {
                view_state.mode = InputMode::TeamName {
                    renaming: Some(view_state.selected_team),
                    buffer: team.name.clone(),
                };
            }
            None
        }
        KeyCode::Char('b') => Some(UserCommand::ExportBackup),
        KeyCode::Char('B') => Some(UserCommand::RestoreLatestBackup),
        KeyCode::Char('X') => {
            view_state.mode = InputMode::ConfirmReset;
            None
        }
        _ => None,
    }
}

fn delta_command(view_state: &ViewState, stat: StatKind, delta: i32) -> Option<UserCommand> {
    let m = view_state.selected_match()?;
    Some(UserCommand::ApplyDelta {
        match_id: m.id,
        stat,
        delta,
        side: view_state.selected_side,
    })
}

fn next_tab(tab: TabId) -> TabId {
    match tab {
        TabId::Matches => TabId::Standings,
        TabId::Standings => TabId::Setup,
        TabId::Setup => TabId::Matches,
    }
}

fn open_match_form(view_state: &mut ViewState) {
    if view_state.league.teams().len() < 2 {
        view_state.notice = Some(Notice::warning("Need at least two teams to create a match"));
        return;
    }
    view_state.mode = InputMode::NewMatch(MatchDraft {
        round: view_state.next_round.max(1),
        home: 0,
        away: 1,
        field: DraftField::Round,
    });
}

/// y/q confirm, n/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        _ => None,
    }
}

fn handle_confirm_reset(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.mode = InputMode::Normal;
            view_state.selected_match = 0;
            view_state.selected_team = 0;
            Some(UserCommand::ResetLeague)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        _ => None,
    }
}

fn handle_team_name(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let InputMode::TeamName { renaming, buffer } = &mut view_state.mode else {
        return None;
    };
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        KeyCode::Backspace => {
            buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            None
        }
        KeyCode::Enter => {
            let name = std::mem::take(buffer);
            let renaming = *renaming;
            view_state.mode = InputMode::Normal;
            match renaming {
                None => Some(UserCommand::AddTeam(name)),
                Some(index) => view_state.league.teams().get(index).map(|team| {
                    UserCommand::RenameTeam {
                        team_id: team.id,
                        name,
                    }
                }),
            }
        }
        _ => None,
    }
}

fn handle_match_form(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let team_count = view_state.league.teams().len();
    let InputMode::NewMatch(draft) = &mut view_state.mode else {
        return None;
    };
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = InputMode::Normal;
            None
        }
        KeyCode::Tab | KeyCode::Down => {
            draft.field = draft.field.next();
            None
        }
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => {
            step_draft(draft, team_count, true);
            None
        }
        KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
            step_draft(draft, team_count, false);
            None
        }
        KeyCode::Enter => {
            if draft.home == draft.away {
                view_state.notice = Some(Notice::warning("Teams must be different!"));
                return None;
            }
            let teams = view_state.league.teams();
            let cmd = match (teams.get(draft.home), teams.get(draft.away)) {
                (Some(home), Some(away)) => Some(UserCommand::AddMatch {
                    round: draft.round,
                    home: home.id,
                    away: away.id,
                }),
                _ => None,
            };
            view_state.mode = InputMode::Normal;
            cmd
        }
        _ => None,
    }
}

/// Move the focused form field one step up or down, wrapping team pickers.
fn step_draft(draft: &mut MatchDraft, team_count: usize, forward: bool) {
    let cycle = |index: usize| -> usize {
        if team_count == 0 {
            0
        } else if forward {
            (index + 1) % team_count
        } else {
            (index + team_count - 1) % team_count
        }
    };
    match draft.field {
        DraftField::Round => {
            draft.round = if forward {
                draft.round.saturating_add(1)
            } else {
                draft.round.saturating_sub(1).max(1)
            };
        }
        DraftField::Home => draft.home = cycle(draft.home),
        DraftField::Away => draft.away = cycle(draft.away),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
