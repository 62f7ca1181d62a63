// Setup widget: team roster, team name entry and league maintenance actions.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::tui::{InputMode, ViewState};

const ACTIONS: &[(&str, &str)] = &[
    ("a", "add team"),
    ("r", "rename selected"),
    ("b", "export backup"),
    ("B", "restore latest backup"),
    ("e", "export standings CSV"),
    ("X", "reset league"),
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let editing = matches!(state.mode, InputMode::TeamName { .. });
    let [teams_area, input_area, actions_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(if editing { 3 } else { 0 }),
        Constraint::Length(ACTIONS.len() as u16 + 2),
    ])
    .areas(area);

    render_teams(frame, teams_area, state);
    if let InputMode::TeamName { renaming, buffer } = &state.mode {
        let title = match renaming.and_then(|i| state.league.teams().get(i)) {
            Some(team) => format!("Rename {} (Enter to save, Esc to cancel)", team.name),
            None => "New team name (Enter to add, Esc to cancel)".to_string(),
        };
        let input = Paragraph::new(format!("{buffer}_")).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        );
        frame.render_widget(input, input_area);
    }
    render_actions(frame, actions_area);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &ViewState) {
    let items: Vec<ListItem> = state
        .league
        .teams()
        .iter()
        .map(|team| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4}  ", team.id), Style::default().fg(Color::Gray)),
                Span::raw(team.name.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Teams ({})", state.league.teams().len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected_team));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_actions(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = ACTIONS
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:>2} "),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*label),
            ])
        })
        .collect();
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("League"));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
