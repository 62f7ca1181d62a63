// Standings widget: the ranked league table.
//
// Columns: Pos, Team, PTS, GP, W, D, L, GD. Leader row in bold, tie-break
// legend along the bottom border.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::tui::ViewState;

pub const TIE_BREAK_LEGEND: &str = "Points > Goal Difference > Goals For";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec!["Pos", "Team", "PTS", "GP", "W", "D", "L", "GD"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .standings
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == 0 && row.games_played > 0 {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(row.team.clone()),
                Cell::from(row.points.to_string()),
                Cell::from(row.games_played.to_string()),
                Cell::from(row.wins.to_string()),
                Cell::from(row.draws.to_string()),
                Cell::from(row.losses.to_string()),
                Cell::from(format_goal_difference(row.goal_difference)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Standings")
            .title_bottom(Line::from(format!(" Tie-break: {TIE_BREAK_LEGEND} "))),
    );
    frame.render_widget(table, area);
}

/// Signed goal difference, e.g. "+3", "0", "-2".
pub fn format_goal_difference(gd: i64) -> String {
    if gd > 0 {
        format!("+{gd}")
    } else {
        gd.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{sample_view, screen_text};

    #[test]
    fn goal_difference_is_signed() {
        assert_eq!(format_goal_difference(3), "+3");
        assert_eq!(format_goal_difference(0), "0");
        assert_eq!(format_goal_difference(-2), "-2");
    }

    #[test]
    fn render_shows_leader_and_legend() {
        let state = sample_view();
        let backend = ratatui::backend::TestBackend::new(80, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = screen_text(terminal.backend());
        let first_row = text.lines().nth(2).unwrap();
        assert!(first_row.contains("Team 1"), "leader row was {first_row:?}");
        assert!(first_row.contains("+2"));
        assert!(text.contains(TIE_BREAK_LEGEND));
    }

    #[test]
    fn render_empty_table_does_not_panic() {
        let state = ViewState::default();
        let backend = ratatui::backend::TestBackend::new(60, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
