//! Event handling for the application.
//!
//! Terminal input is polled by [`EventHandler`] and turned into [`Event`]s;
//! API completions arrive separately through [`crate::tasks`].

mod handler;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;

/// Terminal-side events fed to [`crate::app::App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// The tick interval elapsed with no input.
    Tick,
}
