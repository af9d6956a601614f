//! Reusable UI components.

mod input;
mod loading;
mod notification;

pub use input::TextInput;
pub use loading::LoadingIndicator;
pub use notification::{Notification, NotificationManager};

use ratatui::layout::Rect;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
