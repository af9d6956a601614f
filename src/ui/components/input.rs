//! Single-line text input component.
//!
//! Used for the search box, the filter inputs and the fields of the issue
//! form. The cursor is tracked in characters, not bytes, so non-ASCII text
//! edits correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// A text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position, in characters.
    cursor: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input with an initial value.
    pub fn with_value(value: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_value(value);
        input
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value and move cursor to end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_count();
    }

    /// Clear the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset of the given character index.
    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let changed = !self.value.is_empty();
                self.clear();
                changed
            }
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => self.delete_word_before_cursor(),
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.cursor = 0;
                false
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.cursor = self.char_count();
                false
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            (KeyCode::Backspace, _) => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Delete, _) => {
                if self.cursor >= self.char_count() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                false
            }
            _ => false,
        }
    }

    fn delete_word_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        let end = self.byte_index(self.cursor);
        let before = &self.value[..end];
        let trimmed = before.trim_end_matches(|c: char| !c.is_alphanumeric());
        let start = trimmed
            .rfind(|c: char| !c.is_alphanumeric())
            .map(|i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);

        self.value.replace_range(start..end, "");
        self.cursor = self.value[..start].chars().count();
        true
    }

    /// Render the input field with a bordered label.
    pub fn render_with_label(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let t = theme();
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display = if showing_placeholder {
            self.placeholder.as_str()
        } else {
            self.value.as_str()
        };

        let style = if showing_placeholder {
            Style::default().fg(t.muted)
        } else if focused {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.fg)
        };

        let (border_style, title_style) = if focused {
            (
                Style::default().fg(t.border_focused),
                Style::default()
                    .fg(t.border_focused)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default().fg(t.border), Style::default().fg(t.fg))
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        frame.render_widget(Paragraph::new(display).style(style).block(block), area);

        if focused {
            if let Some(position) = cursor_position(area, self.cursor) {
                frame.set_cursor_position(position);
            }
        }
    }
}

/// Screen position of a character cursor inside a bordered input, if it is
/// within the inner area.
fn cursor_position(area: Rect, cursor: usize) -> Option<Position> {
    let offset = u16::try_from(cursor).ok()?;
    let x = area.x.saturating_add(1).saturating_add(offset);
    let right_border = area.x.saturating_add(area.width.saturating_sub(1));
    (x < right_border && area.height > 2).then(|| Position::new(x, area.y.saturating_add(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_new_input() {
        let input = TextInput::new();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_with_value_puts_cursor_at_end() {
        let input = TextInput::with_value("hello");
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::new();
        assert!(input.handle_input(key(KeyCode::Char('a'))));
        assert!(input.handle_input(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)));
        assert_eq!(input.value(), "aB");

        assert!(input.handle_input(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::with_value("x");
        input.handle_input(key(KeyCode::Home));
        assert!(!input.handle_input(key(KeyCode::Backspace)));
        assert_eq!(input.value(), "x");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInput::with_value("ac");
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = TextInput::with_value("abc");
        input.handle_input(key(KeyCode::Home));
        assert!(input.handle_input(key(KeyCode::Delete)));
        assert_eq!(input.value(), "bc");

        input.handle_input(key(KeyCode::End));
        assert!(!input.handle_input(key(KeyCode::Delete)));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_value("héllo");
        assert_eq!(input.cursor(), 5);
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Left));
        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.value(), "hllo");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::with_value("ab");
        input.handle_input(key(KeyCode::Right));
        assert_eq!(input.cursor(), 2);
        input.handle_input(key(KeyCode::Home));
        input.handle_input(key(KeyCode::Left));
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = TextInput::with_value("some text");
        assert!(input.handle_input(ctrl('u')));
        assert!(input.is_empty());
        assert!(!input.handle_input(ctrl('u')));
    }

    #[test]
    fn test_ctrl_w_deletes_previous_word() {
        let mut input = TextInput::with_value("fix login bug");
        assert!(input.handle_input(ctrl('w')));
        assert_eq!(input.value(), "fix login ");
        assert!(input.handle_input(ctrl('w')));
        assert_eq!(input.value(), "fix ");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_clear() {
        let mut input = TextInput::with_value("hello");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_position_inside_border() {
        let area = Rect::new(10, 5, 20, 3);
        assert_eq!(cursor_position(area, 0), Some(Position::new(11, 6)));
        assert_eq!(cursor_position(area, 17), Some(Position::new(28, 6)));
        assert_eq!(cursor_position(area, 18), None);
    }

    #[test]
    fn test_cursor_position_huge_offset() {
        let area = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(cursor_position(area, usize::MAX), None);
        assert_eq!(cursor_position(area, 70_000), None);
        assert_eq!(cursor_position(area, u16::MAX as usize), None);
    }

    #[test]
    fn test_cursor_position_without_inner_area() {
        assert_eq!(cursor_position(Rect::new(0, 0, 20, 2), 0), None);
    }
}
