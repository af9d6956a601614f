//! Issue form for creating and editing issues.
//!
//! The form is a modal overlay drawn on top of the issue list. It holds the
//! edit buffer for the five editable fields; the list view decides whether a
//! save becomes a create or an update.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::types::IssueFields;
use crate::ui::components::{centered_rect, TextInput};
use crate::ui::theme::theme;

/// Actions returned from the issue form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Close the form without saving.
    Cancel,
    /// Save the buffered fields.
    Submit,
}

/// Focusable elements of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Status,
    Priority,
    Assignee,
    Save,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Priority,
        FormField::Assignee,
        FormField::Save,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// The next field, wrapping around.
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    /// The previous field, wrapping around.
    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::Priority => "Priority",
            FormField::Assignee => "Assignee",
            FormField::Save => "Save",
        }
    }
}

/// The create/edit form and its edit buffer.
#[derive(Debug, Clone, Default)]
pub struct IssueForm {
    title: TextInput,
    description: TextInput,
    status: TextInput,
    priority: TextInput,
    assignee: TextInput,
    focus: FormField,
    submitting: bool,
}

impl IssueForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with the given fields and focus the title.
    pub fn load(&mut self, fields: &IssueFields) {
        self.title = TextInput::with_value(fields.title.as_str());
        self.description = TextInput::with_value(fields.description.as_str());
        self.status = TextInput::with_value(fields.status.as_str());
        self.priority = TextInput::with_value(fields.priority.as_str());
        self.assignee = TextInput::with_value(fields.assignee.as_str());
        self.assignee.set_placeholder("Unassigned");
        self.focus = FormField::Title;
        self.submitting = false;
    }

    /// Discard the buffer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The buffered fields.
    pub fn fields(&self) -> IssueFields {
        IssueFields {
            title: self.title.value().to_string(),
            description: self.description.value().to_string(),
            status: self.status.value().to_string(),
            priority: self.priority.value().to_string(),
            assignee: self.assignee.value().to_string(),
        }
    }

    /// The focused element.
    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// Set the submitting state.
    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Check if a save is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut TextInput> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Status => Some(&mut self.status),
            FormField::Priority => Some(&mut self.priority),
            FormField::Assignee => Some(&mut self.assignee),
            FormField::Save => None,
        }
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the list view.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<FormAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Some(FormAction::Cancel),
            // Ignore further saves until the in-flight one answers
            _ if self.submitting => None,
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => Some(FormAction::Submit),
            (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.focus = self.focus.next();
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::Up, _) => {
                self.focus = self.focus.prev();
                None
            }
            (KeyCode::Enter, _) if self.focus == FormField::Save => Some(FormAction::Submit),
            (KeyCode::Enter, _) => {
                self.focus = self.focus.next();
                None
            }
            _ => {
                if let Some(input) = self.input_mut(self.focus) {
                    input.handle_input(key);
                }
                None
            }
        }
    }

    /// Render the form as a modal overlay.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str) {
        let t = theme();
        let dialog_area = centered_rect(
            area,
            70u16.min(area.width.saturating_sub(4)),
            20u16.min(area.height.saturating_sub(2)),
        );

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", title),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Status | Priority
                Constraint::Length(3), // Assignee
                Constraint::Length(1), // Save button
                Constraint::Min(0),
            ])
            .split(inner);

        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        let field = |f: FormField| (f.label(), self.focus == f);

        let (label, focused) = field(FormField::Title);
        self.title.render_with_label(frame, chunks[0], label, focused);
        let (label, focused) = field(FormField::Description);
        self.description
            .render_with_label(frame, chunks[1], label, focused);
        let (label, focused) = field(FormField::Status);
        self.status.render_with_label(frame, row[0], label, focused);
        let (label, focused) = field(FormField::Priority);
        self.priority.render_with_label(frame, row[1], label, focused);
        let (label, focused) = field(FormField::Assignee);
        self.assignee.render_with_label(frame, chunks[3], label, focused);

        let button_style = if self.focus == FormField::Save {
            Style::default()
                .fg(t.selection_fg)
                .bg(t.success)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.success)
        };
        let button_text = if self.submitting {
            " Saving... "
        } else {
            " [Enter] Save   [Esc] Cancel "
        };
        frame.render_widget(
            Paragraph::new(Span::styled(button_text, button_style)).alignment(Alignment::Center),
            chunks[4],
        );
    }
}
