// New-match form overlay: round and home/away team pickers.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::confirm::centered_rect;
use crate::tui::{DraftField, MatchDraft, ViewState};

const FORM_WIDTH: u16 = 44;
const FORM_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, draft: &MatchDraft) {
    let form_area = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, form_area);

    let teams = state.league.teams();
    let team_name = |index: usize| {
        teams
            .get(index)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "--".to_string())
    };

    let lines = vec![
        field_line("Round", draft.round.to_string(), draft.field == DraftField::Round),
        field_line("Home", team_name(draft.home), draft.field == DraftField::Home),
        field_line("Away", team_name(draft.away), draft.field == DraftField::Away),
        if draft.home == draft.away {
            Line::from(Span::styled(
                "  Teams must be different!",
                Style::default().fg(Color::Red),
            ))
        } else {
            Line::default()
        },
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" New match "),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, form_area);
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw(format!("  {label:<6}")),
        Span::styled(format!("< {value} >"), value_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{sample_view, screen_text};

    fn draw(draft: &MatchDraft) -> String {
        let state = sample_view();
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state, draft))
            .unwrap();
        screen_text(terminal.backend())
    }

    #[test]
    fn shows_round_and_team_names() {
        let text = draw(&MatchDraft {
            round: 3,
            home: 0,
            away: 4,
            field: DraftField::Away,
        });
        assert!(text.contains("< 3 >"));
        assert!(text.contains("< Team 1 >"));
        assert!(text.contains("< Team 5 >"));
        assert!(!text.contains("must be different"));
    }

    #[test]
    fn warns_when_teams_match() {
        let text = draw(&MatchDraft {
            round: 1,
            home: 2,
            away: 2,
            field: DraftField::Home,
        });
        assert!(text.contains("Teams must be different!"));
    }
}
