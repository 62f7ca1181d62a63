// Matches widget: fixtures grouped by round with live score and fouls.
//
// Columns: Rd, #, Home, Score, Away, Fouls, Status.
// The round label is only printed on the first row of each round.
// The selected row is highlighted; the selected side's team is underlined.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::league::matches::{Match, Side};
use crate::league::mutation::PENALTY_FOUL_THRESHOLD;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rows = state.match_rows();
    if rows.is_empty() {
        let paragraph = Paragraph::new("  No matches yet. Press n to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Matches"));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Rd", "#", "Home", "Score", "Away", "Fouls", "Status"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut previous_round = None;
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let round_label = if previous_round == Some(m.round) {
                String::new()
            } else {
                format!("R{}", m.round)
            };
            previous_round = Some(m.round);

            let side = (i == state.selected_match).then_some(state.selected_side);
            Row::new(vec![
                Cell::from(round_label),
                Cell::from(m.id.to_string()),
                team_cell(state, m, Side::Home, side),
                Cell::from(format_score(m)),
                team_cell(state, m, Side::Away, side),
                Cell::from(format_fouls(m)).style(Style::default().fg(foul_color(m))),
                Cell::from(if m.done { "played" } else { "--" }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(7),
        Constraint::Min(12),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Matches ({})", rows.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected_match));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn team_cell<'a>(state: &ViewState, m: &Match, side: Side, selected: Option<Side>) -> Cell<'a> {
    let cell = Cell::from(state.team_label(m.team(side)));
    if selected == Some(side) {
        cell.style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
    } else {
        cell
    }
}

/// "2 - 1"
pub fn format_score(m: &Match) -> String {
    format!("{} - {}", m.g1, m.g2)
}

/// "0 / 2"
pub fn format_fouls(m: &Match) -> String {
    format!("{} / {}", m.f1, m.f2)
}

/// Yellow once either side is one foul away from conceding a penalty.
pub fn foul_color(m: &Match) -> Color {
    let warn_at = PENALTY_FOUL_THRESHOLD.saturating_sub(1);
    if m.f1.max(m.f2) >= warn_at && warn_at > 0 {
        Color::Yellow
    } else {
        Color::White
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
