//! Issue list view.
//!
//! Owns everything the list screen needs: the loaded page, the search text,
//! the status/priority/assignee filters, the sort column and direction, the
//! page number, and the create/edit form buffer. Every change that affects
//! the query hands back the [`IssueQuery`] to send; the view never talks to
//! the network itself.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::debug;

use super::form::{FormAction, IssueForm};
use crate::api::types::{
    total_pages, Issue, IssueField, IssueFields, IssueList, IssueQuery, IssueUpdate, SortOrder,
};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::ui::components::{LoadingIndicator, TextInput};
use crate::ui::theme::{priority_color, status_color, theme};

/// Sort glyph for a column that is not the sort key.
pub const SORT_NEUTRAL: &str = "↕";
/// Sort glyph for ascending order.
pub const SORT_ASC: &str = "↑";
/// Sort glyph for descending order.
pub const SORT_DESC: &str = "↓";

/// Actions returned from the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Fetch a page with this query.
    Load(IssueQuery),
    /// Navigate to an issue's detail screen.
    OpenIssue(u64),
    /// Create an issue from the form buffer.
    Create(IssueFields),
    /// Update an issue from the form buffer.
    Update { id: u64, update: IssueUpdate },
    /// Leave the application.
    Quit,
}

/// What the list screen is doing.
///
/// The form modes draw over the list without replacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    #[default]
    Browsing,
    Creating,
    Editing { id: u64 },
}

/// The query inputs above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Search,
    Status,
    Priority,
    Assignee,
}

impl FilterKind {
    const ALL: [FilterKind; 4] = [
        FilterKind::Search,
        FilterKind::Status,
        FilterKind::Priority,
        FilterKind::Assignee,
    ];

    fn label(self) -> &'static str {
        match self {
            FilterKind::Search => "/ Search",
            FilterKind::Status => "s Status",
            FilterKind::Priority => "p Priority",
            FilterKind::Assignee => "a Assignee",
        }
    }

    /// The issue field whose values are offered as suggestions.
    fn field(self) -> IssueField {
        match self {
            FilterKind::Search => IssueField::Title,
            FilterKind::Status => IssueField::Status,
            FilterKind::Priority => IssueField::Priority,
            FilterKind::Assignee => IssueField::Assignee,
        }
    }
}

/// A filter input being edited.
#[derive(Debug, Clone)]
struct FilterEdit {
    kind: FilterKind,
    input: TextInput,
    suggestion: Option<usize>,
}

/// The issue list view.
#[derive(Debug)]
pub struct ListView {
    /// Issues on the current page.
    issues: Vec<Issue>,
    /// Total matching issues across all pages.
    total: u64,
    /// Shown while a list request is outstanding.
    loading: LoadingIndicator,

    search: String,
    status_filter: String,
    priority_filter: String,
    assignee_filter: String,
    sort_by: Option<IssueField>,
    sort_order: SortOrder,
    /// 1-based page number.
    page: u32,
    page_size: u32,

    mode: ListMode,
    form: IssueForm,
    filter_edit: Option<FilterEdit>,
    table_state: TableState,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListView {
    /// Create a new list view.
    pub fn new(page_size: u32) -> Self {
        Self {
            issues: Vec::new(),
            total: 0,
            loading: LoadingIndicator::with_message("Loading issues..."),
            search: String::new(),
            status_filter: String::new(),
            priority_filter: String::new(),
            assignee_filter: String::new(),
            sort_by: None,
            sort_order: SortOrder::Asc,
            page: 1,
            page_size: page_size.max(1),
            mode: ListMode::Browsing,
            form: IssueForm::new(),
            filter_edit: None,
            table_state: TableState::default(),
        }
    }

    // ========================================================================
    // Query state
    // ========================================================================

    /// The query for the current state.
    ///
    /// Blank search text and empty filters are left unset. Non-blank search
    /// text is kept as typed.
    pub fn query(&self) -> IssueQuery {
        fn non_empty(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        IssueQuery {
            search: (!self.search.trim().is_empty()).then(|| self.search.clone()),
            status: non_empty(&self.status_filter),
            priority: non_empty(&self.priority_filter),
            assignee: non_empty(&self.assignee_filter),
            page: Some(self.page),
            page_size: Some(self.page_size),
            sort_by: self.sort_by,
            sort_order: self.sort_by.map(|_| self.sort_order),
        }
    }

    /// Mark a list request as outstanding and return its query.
    fn load(&mut self) -> IssueQuery {
        self.loading.start();
        let query = self.query();
        debug!(?query, "List query");
        query
    }

    /// Re-issue the current query without changing any state.
    pub fn reload(&mut self) -> IssueQuery {
        self.load()
    }

    /// Set the search text. Resets to page 1.
    pub fn set_search(&mut self, search: impl Into<String>) -> IssueQuery {
        self.search = search.into();
        self.page = 1;
        self.load()
    }

    /// Set one of the filters. Resets to page 1.
    pub fn set_filter(&mut self, kind: FilterKind, value: impl Into<String>) -> IssueQuery {
        let value = value.into();
        match kind {
            FilterKind::Search => self.search = value,
            FilterKind::Status => self.status_filter = value,
            FilterKind::Priority => self.priority_filter = value,
            FilterKind::Assignee => self.assignee_filter = value,
        }
        self.page = 1;
        self.load()
    }

    /// Clear the search text and every filter. Resets to page 1.
    pub fn clear_filters(&mut self) -> IssueQuery {
        self.search.clear();
        self.status_filter.clear();
        self.priority_filter.clear();
        self.assignee_filter.clear();
        self.page = 1;
        self.load()
    }

    /// Sort by a column.
    ///
    /// Choosing the current sort column again flips the direction; a new
    /// column starts ascending. Resets to page 1.
    pub fn sort_by(&mut self, field: IssueField) -> IssueQuery {
        if self.sort_by == Some(field) {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_by = Some(field);
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
        self.load()
    }

    /// Go to a page. Filters and sort are left alone.
    pub fn set_page(&mut self, page: u32) -> IssueQuery {
        self.page = page.max(1);
        self.load()
    }

    /// The current value of a filter input.
    pub fn filter_value(&self, kind: FilterKind) -> &str {
        match kind {
            FilterKind::Search => &self.search,
            FilterKind::Status => &self.status_filter,
            FilterKind::Priority => &self.priority_filter,
            FilterKind::Assignee => &self.assignee_filter,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Option<(IssueField, SortOrder)> {
        self.sort_by.map(|field| (field, self.sort_order))
    }

    /// Number of pages for the last known total.
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.page_size)
    }

    /// Sort glyph for a column header.
    pub fn sort_indicator(&self, field: IssueField) -> &'static str {
        match self.sort() {
            Some((active, SortOrder::Asc)) if active == field => SORT_ASC,
            Some((active, SortOrder::Desc)) if active == field => SORT_DESC,
            _ => SORT_NEUTRAL,
        }
    }

    /// Distinct non-empty values of a field on the loaded page, first seen
    /// first.
    ///
    /// Only the current page is inspected, not the whole result set.
    pub fn unique_values(&self, field: IssueField) -> Vec<String> {
        let mut seen = HashSet::new();
        self.issues
            .iter()
            .map(|issue| issue.field_value(field))
            .filter(|value| !value.is_empty())
            .filter(|value| seen.insert(value.to_string()))
            .map(|value| value.into_owned())
            .collect()
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Replace the loaded page with a server answer.
    pub fn apply_list(&mut self, list: IssueList) {
        self.issues = list.issues;
        self.total = list.total;
        self.loading.stop();

        let selected = match self.table_state.selected() {
            _ if self.issues.is_empty() => None,
            Some(i) => Some(i.min(self.issues.len() - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    /// A list request failed; keep the last good page on screen.
    pub fn list_failed(&mut self) {
        self.loading.stop();
    }

    /// Drop the loaded page, keeping the query state.
    pub fn clear_results(&mut self) {
        self.issues.clear();
        self.total = 0;
        self.table_state.select(None);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// The issue under the cursor.
    pub fn selected_issue(&self) -> Option<&Issue> {
        self.table_state.selected().and_then(|i| self.issues.get(i))
    }

    fn select_next(&mut self) {
        if self.issues.is_empty() {
            return;
        }
        let next = self
            .table_state
            .selected()
            .map_or(0, |i| (i + 1).min(self.issues.len() - 1));
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.issues.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Advance the loading spinner.
    pub fn tick(&mut self) {
        self.loading.tick();
    }

    // ========================================================================
    // Create / edit
    // ========================================================================

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn form(&self) -> &IssueForm {
        &self.form
    }

    /// Open the form for a new issue with default field values.
    pub fn begin_create(&mut self) {
        self.form.load(&IssueFields::default());
        self.mode = ListMode::Creating;
        debug!("Creating issue");
    }

    /// Open the form pre-filled with an issue's editable fields.
    pub fn begin_edit(&mut self, issue: &Issue) {
        self.form.load(&issue.editable_fields());
        self.mode = ListMode::Editing { id: issue.id };
        debug!(id = issue.id, "Editing issue");
    }

    /// Close the form and discard its buffer. No request is made.
    pub fn cancel_form(&mut self) {
        self.form.reset();
        self.mode = ListMode::Browsing;
    }

    /// Turn the form buffer into a create or update action.
    pub fn save(&mut self) -> Option<ListAction> {
        let fields = self.form.fields();
        let action = match self.mode {
            ListMode::Browsing => return None,
            ListMode::Creating => ListAction::Create(fields),
            ListMode::Editing { id } => ListAction::Update {
                id,
                update: fields.into(),
            },
        };
        self.form.set_submitting(true);
        Some(action)
    }

    /// The save went through: close the form and reload the current page.
    pub fn save_succeeded(&mut self) -> IssueQuery {
        self.cancel_form();
        self.load()
    }

    /// The save failed: keep the form open so the user can retry.
    pub fn save_failed(&mut self) {
        self.form.set_submitting(false);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Whether a text input currently owns the keyboard.
    pub fn is_capturing_input(&self) -> bool {
        self.filter_edit.is_some() || self.mode != ListMode::Browsing
    }

    fn begin_filter_edit(&mut self, kind: FilterKind) {
        self.filter_edit = Some(FilterEdit {
            kind,
            input: TextInput::with_value(self.filter_value(kind)),
            suggestion: None,
        });
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ListAction> {
        if self.mode != ListMode::Browsing {
            return match self.form.handle_input(key)? {
                FormAction::Cancel => {
                    self.cancel_form();
                    None
                }
                FormAction::Submit => self.save(),
            };
        }

        if self.filter_edit.is_some() {
            return self.handle_filter_input(key);
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(ListAction::Quit),
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.select_next();
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.select_prev();
                None
            }
            (KeyCode::Enter, _) => self.selected_issue().map(|i| ListAction::OpenIssue(i.id)),
            (KeyCode::Char('/'), _) => {
                self.begin_filter_edit(FilterKind::Search);
                None
            }
            (KeyCode::Char('s'), KeyModifiers::NONE) => {
                self.begin_filter_edit(FilterKind::Status);
                None
            }
            (KeyCode::Char('p'), KeyModifiers::NONE) => {
                self.begin_filter_edit(FilterKind::Priority);
                None
            }
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                self.begin_filter_edit(FilterKind::Assignee);
                None
            }
            (KeyCode::Char('x'), KeyModifiers::NONE) => Some(ListAction::Load(self.clear_filters())),
            (KeyCode::Char(c @ '1'..='7'), KeyModifiers::NONE) => {
                let index = c as usize - '1' as usize;
                let field = IssueField::COLUMNS[index];
                Some(ListAction::Load(self.sort_by(field)))
            }
            (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
                if u64::from(self.page) >= self.total_pages() {
                    return None;
                }
                let next = self.page + 1;
                Some(ListAction::Load(self.set_page(next)))
            }
            (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
                if self.page <= 1 {
                    return None;
                }
                let prev = self.page - 1;
                Some(ListAction::Load(self.set_page(prev)))
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(ListAction::Load(self.reload())),
            (KeyCode::Char('c'), KeyModifiers::NONE) => {
                self.begin_create();
                None
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                if let Some(issue) = self.selected_issue().cloned() {
                    self.begin_edit(&issue);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_filter_input(&mut self, key: KeyEvent) -> Option<ListAction> {
        let edit = self.filter_edit.as_mut()?;

        match key.code {
            KeyCode::Esc => {
                self.filter_edit = None;
                None
            }
            KeyCode::Enter => {
                let kind = edit.kind;
                let value = edit.input.value().to_string();
                self.filter_edit = None;
                Some(ListAction::Load(self.set_filter(kind, value)))
            }
            KeyCode::Tab => {
                let field = edit.kind.field();
                let suggestions = self.unique_values(field);
                if let Some(edit) = self.filter_edit.as_mut() {
                    if !suggestions.is_empty() {
                        let next = edit.suggestion.map_or(0, |i| (i + 1) % suggestions.len());
                        edit.suggestion = Some(next);
                        edit.input.set_value(suggestions[next].as_str());
                    }
                }
                None
            }
            _ => {
                if edit.input.handle_input(key) {
                    edit.suggestion = None;
                }
                None
            }
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the list screen.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search and filters
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Status line
            ])
            .split(area);

        self.render_filters(frame, chunks[0]);
        self.render_table(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);

        match self.mode {
            ListMode::Browsing => {}
            ListMode::Creating => self.form.render(frame, area, "New Issue"),
            ListMode::Editing { id } => {
                self.form.render(frame, area, &format!("Edit Issue #{}", id))
            }
        }
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ])
            .split(area);

        for (kind, column) in FilterKind::ALL.into_iter().zip(columns.iter()) {
            match &self.filter_edit {
                Some(edit) if edit.kind == kind => {
                    edit.input.render_with_label(frame, *column, kind.label(), true)
                }
                _ => {
                    let mut input = TextInput::with_value(self.filter_value(kind));
                    input.set_placeholder("any");
                    input.render_with_label(frame, *column, kind.label(), false);
                }
            }
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let t = theme();

        let header = Row::new(IssueField::COLUMNS.iter().enumerate().map(|(i, field)| {
            let style = if self.sort_by == Some(*field) {
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(t.fg).add_modifier(Modifier::BOLD)
            };
            Cell::from(format!(
                "{}:{} {}",
                i + 1,
                field.label(),
                self.sort_indicator(*field)
            ))
            .style(style)
        }));

        let rows = self.issues.iter().map(|issue| {
            Row::new(vec![
                Cell::from(issue.id.to_string()),
                Cell::from(issue.title.clone()),
                Cell::from(issue.status.clone()).style(Style::default().fg(status_color(&issue.status))),
                Cell::from(issue.priority.clone())
                    .style(Style::default().fg(priority_color(&issue.priority))),
                Cell::from(issue.assignee.clone()),
                Cell::from(short_timestamp(&issue.created_at)),
                Cell::from(short_timestamp(&issue.updated_at)),
            ])
        });

        let widths = [
            Constraint::Length(7),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(18),
            Constraint::Length(18),
        ];

        let title = format!(" Issues ({}) ", self.total);
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(t.border)),
            )
            .highlight_style(Style::default().fg(t.selection_fg).bg(t.selection_bg));

        frame.render_stateful_widget(table, area, &mut self.table_state);

        // The hint sits on the first body row, inside the borders
        let hint = Rect::new(
            area.x.saturating_add(2),
            area.y.saturating_add(2),
            area.width.saturating_sub(4),
            1,
        )
        .intersection(area);
        if self.issues.is_empty()
            && !self.loading.is_active()
            && area.height >= 4
            && !hint.is_empty()
        {
            frame.render_widget(
                Paragraph::new("No issues found. Press 'c' to create one.")
                    .style(Style::default().fg(t.muted)),
                hint,
            );
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let mut spans = vec![Span::styled(
            format!(
                " Page {} of {} · {} total ",
                self.page,
                self.total_pages().max(1),
                self.total
            ),
            Style::default().fg(t.fg),
        )];
        if self.loading.is_active() {
            spans.push(Span::styled(self.loading.text(), Style::default().fg(t.accent)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Trim a server timestamp to minutes for the table.
fn short_timestamp(timestamp: &str) -> String {
    timestamp.chars().take(16).collect::<String>().replace('T', " ")
}
