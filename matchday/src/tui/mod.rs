// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the session state. The session
// controller pushes `UiUpdate` messages over an mpsc channel; the TUI applies
// them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::league::matches::{Match, Side};
use crate::league::standings::StandingsRow;
use crate::league::state::LeagueState;
use crate::league::team::{Team, TeamId};
use crate::protocol::{AppSnapshot, Notice, TabId, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Input modes
// ---------------------------------------------------------------------------

/// Field of the new-match form that currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Round,
    Home,
    Away,
}

impl DraftField {
    pub fn next(self) -> Self {
        match self {
            DraftField::Round => DraftField::Home,
            DraftField::Home => DraftField::Away,
            DraftField::Away => DraftField::Round,
        }
    }
}

/// Pending new match being edited in the form.
///
/// `home` and `away` index into the team list at the time the form opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDraft {
    pub round: u32,
    pub home: usize,
    pub away: usize,
    pub field: DraftField,
}

/// What keystrokes currently mean.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    ConfirmQuit,
    ConfirmReset,
    /// Typing a team name. `renaming` is the index of the team being renamed,
    /// `None` when adding a new team.
    TeamName {
        renaming: Option<usize>,
        buffer: String,
    },
    NewMatch(MatchDraft),
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the session state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    pub league_name: String,
    pub league: LeagueState,
    pub standings: Vec<StandingsRow>,
    pub next_round: u32,
    pub undo_depth: usize,
    pub dirty: bool,
    pub backend: &'static str,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Row index into `match_rows()`.
    pub selected_match: usize,
    /// Side that goal/foul keys apply to.
    pub selected_side: Side,
    /// Row index into the team list on the Setup tab.
    pub selected_team: usize,
    pub mode: InputMode,
    /// Most recent notice from the session controller.
    pub notice: Option<Notice>,
}

impl ViewState {
    /// Apply a full state snapshot, keeping selections in range.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.league_name = snapshot.league_name;
        self.league = snapshot.league;
        self.standings = snapshot.standings;
        self.next_round = snapshot.next_round;
        self.undo_depth = snapshot.undo_depth;
        self.dirty = snapshot.dirty;
        self.backend = snapshot.backend;

        self.selected_match = clamp_index(self.selected_match, self.league.matches().len());
        self.selected_team = clamp_index(self.selected_team, self.league.teams().len());
    }

    /// Matches in display order: by round, then by id.
    pub fn match_rows(&self) -> Vec<&Match> {
        let mut rows: Vec<&Match> = self.league.matches().iter().collect();
        rows.sort_by_key(|m| (m.round, m.id));
        rows
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.match_rows().get(self.selected_match).copied()
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.league.teams().get(self.selected_team)
    }

    /// Team name for display, falling back to the raw id for dangling
    /// references.
    pub fn team_label(&self, id: TeamId) -> String {
        self.league
            .team_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}"))
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Notice(notice) => state.notice = Some(notice),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();
    let layout = build_layout(area);

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Matches => widgets::matches::render(frame, layout.main_panel, state),
        TabId::Standings => widgets::standings::render(frame, layout.main_panel, state),
        TabId::Setup => widgets::setup::render(frame, layout.main_panel, state),
    }
    widgets::notice_line::render(frame, layout.notice_line, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    match &state.mode {
        InputMode::ConfirmQuit => {
            let prompt = if state.dirty {
                "Unsaved changes. Quit?"
            } else {
                "Really quit?"
            };
            widgets::confirm::render(frame, area, " Quit? ", prompt);
        }
        InputMode::ConfirmReset => {
            widgets::confirm::render(frame, area, " Reset league ", "Delete all data?")
        }
        InputMode::NewMatch(draft) => widgets::match_form::render(frame, area, state, draft),
        InputMode::Normal | InputMode::TeamName { .. } => {}
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Session controller has shut down.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
