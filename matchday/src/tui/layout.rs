// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Main Panel (tab content)                          |
// |                                                   |
// +--------------------------------------------------+
// | Notice Line (1 row)                               |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// League name, tabs, backend and unsaved marker.
    pub status_bar: Rect,
    /// Content of the active tab.
    pub main_panel: Rect,
    /// Latest notice from the session controller.
    pub notice_line: Rect,
    /// Keyboard shortcut hints for the active tab.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // main panel
            Constraint::Length(1), // notice line
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        notice_line: vertical[2],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        for (name, rect) in [
            ("status_bar", layout.status_bar),
            ("main_panel", layout.main_panel),
            ("notice_line", layout.notice_line),
            ("help_bar", layout.help_bar),
        ] {
            assert!(rect.width > 0 && rect.height > 0, "{name} has zero area: {rect:?}");
        }
    }

    #[test]
    fn single_row_bars_and_main_fills_rest() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.notice_line.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 37);
        assert_eq!(layout.help_bar.y, 39);
    }

    #[test]
    fn layout_full_width() {
        let layout = build_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.main_panel.width, 80);
        assert_eq!(layout.status_bar.width, 80);
    }
}
