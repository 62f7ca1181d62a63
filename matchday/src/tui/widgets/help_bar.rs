// Help bar widget: key hints for the active tab and input mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TabId;
use crate::tui::{InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        hint_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Key hints for the current mode and tab.
pub fn hint_text(state: &ViewState) -> &'static str {
    match (&state.mode, state.active_tab) {
        (InputMode::ConfirmQuit | InputMode::ConfirmReset, _) => " y:Confirm | n/Esc:Cancel",
        (InputMode::TeamName { .. }, _) => " Enter:Submit | Esc:Cancel | Backspace:Delete",
        (InputMode::NewMatch(_), _) => {
            " Tab:Next field | \u{2190}/\u{2192}:Change | Enter:Create | Esc:Cancel"
        }
        (InputMode::Normal, TabId::Matches) => {
            " q:Quit | 1-3:Tabs | \u{2191}\u{2193}:Match | \u{2190}\u{2192}:Side | +/-:Goal | f/F:Foul | n:New | d:Delete | u:Undo | s:Save"
        }
        (InputMode::Normal, TabId::Standings) => " q:Quit | 1-3:Tabs | e:Export CSV | u:Undo | s:Save",
        (InputMode::Normal, TabId::Setup) => {
            " q:Quit | 1-3:Tabs | \u{2191}\u{2193}:Team | a:Add | r:Rename | b/B:Backup/Restore | X:Reset | s:Save"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_tab_and_mode() {
        let mut state = ViewState::default();
        assert!(hint_text(&state).contains("f/F:Foul"));

        state.active_tab = TabId::Setup;
        assert!(hint_text(&state).contains("r:Rename"));

        state.mode = InputMode::ConfirmReset;
        assert!(hint_text(&state).starts_with(" y:Confirm"));
    }

    #[test]
    fn render_does_not_panic() {
        let state = ViewState::default();
        let backend = ratatui::backend::TestBackend::new(40, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
