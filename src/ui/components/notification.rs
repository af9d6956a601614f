//! Toast notifications for transient feedback.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// How long a confirmation stays on screen.
const DISPLAY_DURATION: Duration = Duration::from_secs(3);

/// A confirmation message for a completed save.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    /// Create a new notification.
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration,
        }
    }

    /// Create a success notification (3 seconds).
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, DISPLAY_DURATION)
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Manages the queue of visible notifications.
#[derive(Debug)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    max_visible: usize,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    /// Create a new notification manager.
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_visible: 3,
        }
    }

    /// Add a notification, dropping the oldest past the visible limit.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > self.max_visible {
            self.notifications.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::success(message));
    }

    /// Remove expired notifications. Called on each tick.
    pub fn tick(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Iterate over the current notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Render the notifications stacked in the top-right corner of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width);
        for (i, notification) in self.notifications.iter().enumerate() {
            let y = area.y + 1 + (i as u16) * 3;
            if y + 3 > area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, 3);
            let color = theme().success;
            let line = Line::from(vec![
                Span::styled("✓ ", Style::default().fg(color)),
                Span::raw(notification.message.as_str()),
            ]);

            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(line).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_len() {
        let mut manager = NotificationManager::new();
        assert!(manager.is_empty());
        manager.success("Created issue #1");
        manager.success("Updated issue #1");
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_max_visible_drops_oldest() {
        let mut manager = NotificationManager::new();
        for i in 0..5 {
            manager.success(format!("message {}", i));
        }
        assert_eq!(manager.len(), 3);
        assert_eq!(manager.iter().next().unwrap().message, "message 2");
    }

    #[test]
    fn test_tick_removes_expired() {
        let mut manager = NotificationManager::new();
        manager.push(Notification::new("gone", Duration::from_millis(0)));
        manager.success("stays");
        std::thread::sleep(Duration::from_millis(5));
        manager.tick();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.iter().next().unwrap().message, "stays");
    }
}
