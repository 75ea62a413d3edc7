//! Timed fill-in-the-blank sentence quiz. The `quiz` and `session` modules are
//! UI-independent; `app` and `ui` drive them from a ratatui terminal front end.

pub mod app;
pub mod config;
pub mod email;
pub mod event;
pub mod logging;
pub mod notify;
pub mod quiz;
pub mod session;
pub mod store;
pub mod ui;
