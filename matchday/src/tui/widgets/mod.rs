// TUI widget modules for each dashboard panel.

pub mod confirm;
pub mod help_bar;
pub mod match_form;
pub mod matches;
pub mod notice_line;
pub mod setup;
pub mod standings;
pub mod status_bar;
