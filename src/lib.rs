//! issuedesk - a terminal client for an issue tracking service.
//!
//! The library holds everything except terminal setup so the application
//! state machine and the HTTP client can be tested without a TTY.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod route;
pub mod tasks;
pub mod ui;
