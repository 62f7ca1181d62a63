// Library root: exposes the league engine, storage and session modules to the
// binary and to integration tests.

pub mod app;
pub mod config;
pub mod league;
pub mod protocol;
pub mod store;
pub mod tui;
