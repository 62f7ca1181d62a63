// Notice line widget: the latest message from the session controller.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(notice) = &state.notice else {
        return;
    };
    let paragraph = Paragraph::new(format!(" {}", notice.text))
        .style(Style::default().fg(level_color(notice.level)));
    frame.render_widget(paragraph, area);
}

pub fn level_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}
