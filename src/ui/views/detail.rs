//! Issue detail view.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use crate::api::types::Issue;
use crate::route::parse_issue_id;
use crate::ui::components::LoadingIndicator;
use crate::ui::theme::{priority_color, status_color, theme};

/// Actions returned from the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    /// Return to the issue list.
    GoBack,
}

/// The issue detail view.
#[derive(Debug)]
pub struct DetailView {
    issue: Option<Issue>,
    issue_id: Option<u64>,
    loading: LoadingIndicator,
    scroll: u16,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            issue: None,
            issue_id: None,
            loading: LoadingIndicator::with_message("Loading issue..."),
            scroll: 0,
        }
    }

    /// Enter the view for a raw route segment.
    ///
    /// Any previously shown issue is dropped. Returns the id to fetch, or
    /// `None` when the segment is not a valid id, in which case the view
    /// stays empty.
    pub fn activate(&mut self, segment: &str) -> Option<u64> {
        self.issue = None;
        self.scroll = 0;
        self.issue_id = parse_issue_id(segment);

        match self.issue_id {
            Some(id) => {
                self.loading.start();
                Some(id)
            }
            None => {
                debug!(segment, "Route segment is not an issue id, skipping fetch");
                self.loading.stop();
                None
            }
        }
    }

    /// Show a fetched issue.
    pub fn set_issue(&mut self, issue: Issue) {
        self.issue_id = Some(issue.id);
        self.issue = Some(issue);
        self.loading.stop();
    }

    /// Leave the view, dropping the shown issue.
    pub fn clear(&mut self) {
        self.issue = None;
        self.issue_id = None;
        self.scroll = 0;
        self.loading.stop();
    }

    /// The id being shown or fetched.
    pub fn issue_id(&self) -> Option<u64> {
        self.issue_id
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    pub fn tick(&mut self) {
        self.loading.tick();
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<DetailAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Backspace, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                Some(DetailAction::GoBack)
            }
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            _ => None,
        }
    }

    /// Render the detail screen.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = theme();

        let Some(issue) = &self.issue else {
            let text = if self.loading.is_active() {
                self.loading.text()
            } else {
                "No issue to show. Press Esc to go back.".to_string()
            };
            frame.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(t.muted))
                    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(t.border))),
                area,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(area);

        let label = |name: &'static str| {
            Span::styled(
                format!("{:<10}", name),
                Style::default().fg(t.muted).add_modifier(Modifier::BOLD),
            )
        };
        let assignee = if issue.assignee.is_empty() {
            Span::styled("Unassigned", Style::default().fg(t.muted))
        } else {
            Span::raw(issue.assignee.as_str())
        };

        let fields = vec![
            Line::from(vec![
                label("Status"),
                Span::styled(issue.status.as_str(), Style::default().fg(status_color(&issue.status))),
            ]),
            Line::from(vec![
                label("Priority"),
                Span::styled(
                    issue.priority.as_str(),
                    Style::default().fg(priority_color(&issue.priority)),
                ),
            ]),
            Line::from(vec![label("Assignee"), assignee]),
            Line::from(vec![label("Created"), Span::raw(issue.created_at.as_str())]),
            Line::from(vec![label("Updated"), Span::raw(issue.updated_at.as_str())]),
        ];

        let title = Span::styled(
            format!(" #{} {} ", issue.id, issue.title),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        );
        frame.render_widget(
            Paragraph::new(fields).block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(t.border_focused)),
            ),
            chunks[0],
        );

        let description = if issue.description.is_empty() {
            Paragraph::new("No description").style(Style::default().fg(t.muted))
        } else {
            Paragraph::new(issue.description.as_str()).style(Style::default().fg(t.fg))
        };
        frame.render_widget(
            description
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0))
                .block(
                    Block::default()
                        .title(" Description ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(t.border)),
                ),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue(id: u64) -> Issue {
        Issue {
            id,
            title: "Login fails".to_string(),
            description: "Steps to reproduce".to_string(),
            status: "open".to_string(),
            priority: "high".to_string(),
            assignee: "alice".to_string(),
            created_at: "2024-03-01T09:15:30".to_string(),
            updated_at: "2024-03-01T09:15:30".to_string(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_activate_valid_id_starts_loading() {
        let mut view = DetailView::new();
        assert_eq!(view.activate("42"), Some(42));
        assert!(view.is_loading());
        assert_eq!(view.issue_id(), Some(42));
        assert!(view.issue().is_none());
    }

    #[test]
    fn test_activate_invalid_id_skips_fetch() {
        let mut view = DetailView::new();
        for segment in ["abc", "", "0", "-3", "1.5"] {
            assert_eq!(view.activate(segment), None, "segment {:?}", segment);
            assert!(!view.is_loading());
            assert!(view.issue().is_none());
        }
    }

    #[test]
    fn test_activate_drops_previous_issue() {
        let mut view = DetailView::new();
        view.activate("1");
        view.set_issue(sample_issue(1));
        assert!(view.issue().is_some());

        view.activate("2");
        assert!(view.issue().is_none());
        assert_eq!(view.issue_id(), Some(2));
    }

    #[test]
    fn test_set_issue_stops_loading() {
        let mut view = DetailView::new();
        view.activate("7");
        view.set_issue(sample_issue(7));
        assert!(!view.is_loading());
        assert_eq!(view.issue().map(|i| i.title.as_str()), Some("Login fails"));
    }

    #[test]
    fn test_back_keys() {
        let mut view = DetailView::new();
        for code in [KeyCode::Esc, KeyCode::Backspace, KeyCode::Char('q')] {
            assert_eq!(view.handle_input(key(code)), Some(DetailAction::GoBack));
        }
    }

    #[test]
    fn test_scroll() {
        let mut view = DetailView::new();
        assert_eq!(view.handle_input(key(KeyCode::Char('k'))), None);
        assert_eq!(view.scroll, 0);
        view.handle_input(key(KeyCode::Char('j')));
        view.handle_input(key(KeyCode::Char('j')));
        assert_eq!(view.scroll, 2);
    }

    #[test]
    fn test_clear() {
        let mut view = DetailView::new();
        view.activate("3");
        view.set_issue(sample_issue(3));
        view.clear();
        assert!(view.issue().is_none());
        assert_eq!(view.issue_id(), None);
    }
}
