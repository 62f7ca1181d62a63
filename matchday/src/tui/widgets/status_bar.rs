// Status bar widget: league name, tab indicator, backend and save state.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [league name] | [tab bar] | [backend] [save indicator] [undo depth]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.league_name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::Gray)),
    ];
    spans.extend(tab_spans(state.active_tab));
    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("{} ", state.backend),
        Style::default().fg(Color::Gray),
    ));
    let (label, color) = save_indicator(state.dirty);
    spans.push(Span::styled(label, Style::default().fg(color)));
    if state.undo_depth > 0 {
        spans.push(Span::styled(
            format!("  undo:{}", state.undo_depth),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Label and color for the unsaved-changes indicator.
pub fn save_indicator(dirty: bool) -> (&'static str, Color) {
    if dirty {
        ("● unsaved", Color::Yellow)
    } else {
        ("● saved", Color::Green)
    }
}

/// Tab indicator spans with the active tab highlighted.
/// E.g. "[1:Matches] [2:Standings] [3:Setup]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Matches, "1:Matches"),
        (TabId::Standings, "2:Standings"),
        (TabId::Setup, "3:Setup"),
    ];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{label}]"), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
