//! Theme and styling configuration.

use ratatui::style::Color;

/// Color theme for the application.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Accent for titles and focused elements.
    pub accent: Color,
    /// Border color.
    pub border: Color,
    /// Border color of the focused element.
    pub border_focused: Color,
    /// Muted text (placeholders, hints).
    pub muted: Color,
    /// Selected row background.
    pub selection_bg: Color,
    /// Selected row foreground.
    pub selection_fg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

static DEFAULT_THEME: Theme = Theme {
    fg: Color::White,
    accent: Color::Cyan,
    border: Color::DarkGray,
    border_focused: Color::Yellow,
    muted: Color::DarkGray,
    selection_bg: Color::Cyan,
    selection_fg: Color::Black,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
};

/// The active theme.
pub fn theme() -> &'static Theme {
    &DEFAULT_THEME
}

/// Color for a priority value.
pub fn priority_color(priority: &str) -> Color {
    match priority.to_ascii_lowercase().as_str() {
        "critical" | "urgent" | "highest" => Color::LightRed,
        "high" => DEFAULT_THEME.error,
        "medium" => DEFAULT_THEME.warning,
        "low" | "lowest" => DEFAULT_THEME.success,
        _ => DEFAULT_THEME.fg,
    }
}

/// Color for a status value.
pub fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "open" | "todo" => Color::Blue,
        "in_progress" | "in progress" | "in-progress" => DEFAULT_THEME.warning,
        "closed" | "done" | "resolved" => DEFAULT_THEME.success,
        _ => DEFAULT_THEME.fg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_color_is_case_insensitive() {
        assert_eq!(priority_color("High"), Color::Red);
        assert_eq!(priority_color("medium"), Color::Yellow);
        assert_eq!(priority_color("whatever"), theme().fg);
    }

    #[test]
    fn test_status_color() {
        assert_eq!(status_color("open"), Color::Blue);
        assert_eq!(status_color("Closed"), Color::Green);
    }
}
