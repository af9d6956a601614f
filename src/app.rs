//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern for predictable
//! state management in the TUI application. Terminal events and API
//! completions both flow through [`App`]; requests are queued and handed to the
//! task spawner by the main loop, never awaited here.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::events::Event;
use crate::route::Route;
use crate::tasks::{ApiMessage, ApiRequest};
use crate::ui::theme::theme;
use crate::ui::{
    DetailAction, DetailView, ListAction, ListMode, ListView, NotificationManager,
};

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    /// The active screen.
    route: Route,
    /// Whether the application should quit.
    should_quit: bool,
    /// The issue list view.
    list_view: ListView,
    /// The issue detail view.
    detail_view: DetailView,
    /// Toast messages.
    notifications: NotificationManager,
    /// Requests waiting for the main loop to spawn them.
    pending_requests: Vec<ApiRequest>,
    /// Shown in the header.
    server_url: String,
}

impl App {
    /// Create a new application instance.
    ///
    /// Nothing is loaded until the first [`App::navigate`].
    pub fn new(config: &Config) -> Self {
        debug!(
            server = %config.server.url,
            page_size = config.settings.page_size,
            "Creating application"
        );

        Self {
            route: Route::List,
            should_quit: false,
            list_view: ListView::new(config.settings.page_size),
            detail_view: DetailView::new(),
            notifications: NotificationManager::new(),
            pending_requests: Vec::new(),
            server_url: config.server.url.clone(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn list_view(&self) -> &ListView {
        &self.list_view
    }

    pub fn list_view_mut(&mut self) -> &mut ListView {
        &mut self.list_view
    }

    pub fn detail_view(&self) -> &DetailView {
        &self.detail_view
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Take the requests queued since the last call.
    pub fn take_pending_requests(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.pending_requests)
    }

    fn request(&mut self, request: ApiRequest) {
        trace!(?request, "Queueing request");
        self.pending_requests.push(request);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switch screens.
    ///
    /// Entering the list drops the loaded page but keeps the query state, then
    /// loads again. Entering a detail route fetches the issue when the path
    /// segment is a usable id.
    pub fn navigate(&mut self, route: Route) {
        info!(from = %self.route, to = %route, "Navigating");

        match &route {
            Route::List => {
                self.detail_view.clear();
                self.list_view.clear_results();
                let query = self.list_view.reload();
                self.request(ApiRequest::ListIssues(query));
            }
            Route::Detail(segment) => {
                if let Some(id) = self.detail_view.activate(segment) {
                    self.request(ApiRequest::GetIssue(id));
                }
            }
        }

        self.route = route;
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Update application state based on an event.
    ///
    /// This implements the Update part of The Elm Architecture (TEA).
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                self.handle_key_event(key_event);
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {
                self.list_view.tick();
                self.detail_view.tick();
                self.notifications.tick();
            }
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            self.should_quit = true;
            return;
        }

        match self.route {
            Route::List => {
                if let Some(action) = self.list_view.handle_input(key_event) {
                    self.handle_list_action(action);
                }
            }
            Route::Detail(_) => {
                if let Some(DetailAction::GoBack) = self.detail_view.handle_input(key_event) {
                    debug!("Going back to issue list");
                    self.navigate(Route::List);
                }
            }
        }
    }

    fn handle_list_action(&mut self, action: ListAction) {
        match action {
            ListAction::Quit => {
                self.should_quit = true;
            }
            ListAction::Load(query) => {
                self.request(ApiRequest::ListIssues(query));
            }
            ListAction::OpenIssue(id) => {
                debug!(id, "Opening issue detail");
                self.navigate(Route::issue(id));
            }
            ListAction::Create(fields) => {
                info!(title = %fields.title, "Creating issue");
                self.request(ApiRequest::CreateIssue(fields));
            }
            ListAction::Update { id, update } => {
                info!(id, "Updating issue");
                self.request(ApiRequest::UpdateIssue { id, update });
            }
        }
    }

    /// Apply the result of a background request.
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::IssuesListed(Ok(list)) => {
                debug!(count = list.issues.len(), total = list.total, "Issues loaded");
                self.list_view.apply_list(list);
            }
            ApiMessage::IssuesListed(Err(e)) => {
                warn!(error = %e, "Failed to load issues");
                self.list_view.list_failed();
            }
            ApiMessage::IssueFetched { id, result } => {
                let showing = matches!(self.route, Route::Detail(_))
                    && self.detail_view.issue_id() == Some(id);
                if !showing {
                    debug!(id, "Discarding issue for inactive detail route");
                    return;
                }
                match result {
                    Ok(issue) => {
                        debug!(id, "Issue loaded");
                        self.detail_view.set_issue(issue);
                    }
                    Err(e) => {
                        warn!(id, error = %e, "Failed to load issue, returning to list");
                        self.navigate(Route::List);
                    }
                }
            }
            ApiMessage::IssueCreated(Ok(issue)) => {
                info!(id = issue.id, "Issue created");
                self.notifications
                    .success(format!("Created issue #{}", issue.id));
                let query = self.list_view.save_succeeded();
                self.request(ApiRequest::ListIssues(query));
            }
            ApiMessage::IssueUpdated { id, result: Ok(_) } => {
                info!(id, "Issue updated");
                self.notifications.success(format!("Updated issue #{}", id));
                let query = self.list_view.save_succeeded();
                self.request(ApiRequest::ListIssues(query));
            }
            ApiMessage::IssueCreated(Err(e)) => {
                warn!(error = %e, "Failed to create issue");
                self.list_view.save_failed();
            }
            ApiMessage::IssueUpdated { id, result: Err(e) } => {
                warn!(id, error = %e, "Failed to update issue");
                self.list_view.save_failed();
            }
        }
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Render the application UI.
    ///
    /// This implements the View part of The Elm Architecture (TEA).
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Key hints
            ])
            .split(area);

        self.render_header(frame, chunks[0]);

        match self.route {
            Route::List => self.list_view.render(frame, chunks[1]),
            Route::Detail(_) => self.detail_view.render(frame, chunks[1]),
        }

        self.render_footer(frame, chunks[2]);
        self.notifications.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let header = Line::from(vec![
            Span::styled(
                " issuedesk ",
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.route.path(), Style::default().fg(t.fg)),
            Span::styled(format!("  {}", self.server_url), Style::default().fg(t.muted)),
        ]);
        frame.render_widget(
            Paragraph::new(header).block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(t.border)),
            ),
            area,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.route {
            Route::Detail(_) => "Esc/q back · j/k scroll · Ctrl+C quit",
            Route::List => match self.list_view.mode() {
                ListMode::Creating | ListMode::Editing { .. } => {
                    "Tab next · Shift+Tab prev · Ctrl+S save · Esc cancel"
                }
                ListMode::Browsing if self.list_view.is_capturing_input() => {
                    "Enter apply · Tab suggest · Esc cancel"
                }
                ListMode::Browsing => {
                    "/ search · s/p/a filter · 1-7 sort · n/b page · c new · e edit · Enter open · x clear · q quit"
                }
            },
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", hints), Style::default().fg(theme().muted))),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Issue, IssueList, IssueQuery};
    use crate::api::ApiError;
    use crate::ui::FilterKind;

    fn test_issue(id: u64) -> Issue {
        Issue {
            id,
            title: format!("Issue {}", id),
            description: String::new(),
            status: "open".to_string(),
            priority: "medium".to_string(),
            assignee: String::new(),
            created_at: "2024-03-01T09:15:30".to_string(),
            updated_at: "2024-03-01T09:15:30".to_string(),
        }
    }

    fn listed(issues: Vec<Issue>, total: u64) -> ApiMessage {
        ApiMessage::IssuesListed(Ok(IssueList {
            issues,
            total,
            page: None,
            page_size: None,
        }))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn list_queries(requests: &[ApiRequest]) -> Vec<&IssueQuery> {
        requests
            .iter()
            .filter_map(|r| match r {
                ApiRequest::ListIssues(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    /// An app on the list route with one loaded page and no pending requests.
    fn loaded_app() -> App {
        let mut app = App::new(&Config::default());
        app.navigate(Route::List);
        app.take_pending_requests();
        app.handle_api_message(listed(vec![test_issue(1), test_issue(2)], 25));
        app
    }

    #[test]
    fn test_new_app_is_idle() {
        let mut app = App::new(&Config::default());
        assert_eq!(app.route(), &Route::List);
        assert!(!app.should_quit());
        assert!(app.take_pending_requests().is_empty());
    }

    #[test]
    fn test_navigate_list_loads_first_page() {
        let mut app = App::new(&Config::default());
        app.navigate(Route::List);
        let requests = app.take_pending_requests();
        assert_eq!(requests.len(), 1);
        let query = list_queries(&requests)[0];
        assert_eq!(query.page, Some(1));
        assert_eq!(query.page_size, Some(10));
        assert!(app.list_view().is_loading());
    }

    #[test]
    fn test_page_size_from_config() {
        let mut config = Config::default();
        config.settings.page_size = 25;
        let mut app = App::new(&config);
        app.navigate(Route::List);
        let requests = app.take_pending_requests();
        assert_eq!(list_queries(&requests)[0].page_size, Some(25));
    }

    #[test]
    fn test_quit_on_q_in_list() {
        let mut app = loaded_app();
        app.update(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_on_ctrl_c_anywhere() {
        let mut app = loaded_app();
        app.navigate(Route::issue(1));
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn test_enter_opens_detail_and_fetches() {
        let mut app = loaded_app();
        app.update(key(KeyCode::Enter));
        assert_eq!(app.route(), &Route::issue(1));
        assert_eq!(app.take_pending_requests(), vec![ApiRequest::GetIssue(1)]);
    }

    #[test]
    fn test_detail_with_non_numeric_id_does_nothing() {
        let mut app = loaded_app();
        app.navigate(Route::Detail("abc".to_string()));
        assert!(app.take_pending_requests().is_empty());
        assert_eq!(app.route(), &Route::Detail("abc".to_string()));
        assert!(app.detail_view().issue().is_none());
    }

    #[test]
    fn test_detail_with_missing_id_does_nothing() {
        let mut app = loaded_app();
        app.navigate(Route::Detail(String::new()));
        assert!(app.take_pending_requests().is_empty());
        assert!(matches!(app.route(), Route::Detail(_)));
    }

    #[test]
    fn test_detail_success_shows_issue() {
        let mut app = loaded_app();
        app.navigate(Route::issue(7));
        app.handle_api_message(ApiMessage::IssueFetched {
            id: 7,
            result: Ok(test_issue(7)),
        });
        assert_eq!(app.detail_view().issue().map(|i| i.id), Some(7));
        assert!(!app.detail_view().is_loading());
    }

    #[test]
    fn test_detail_failure_returns_to_list() {
        let mut app = loaded_app();
        app.navigate(Route::issue(999));
        app.take_pending_requests();

        app.handle_api_message(ApiMessage::IssueFetched {
            id: 999,
            result: Err(ApiError::NotFound("Issue 999 not found".to_string())),
        });

        assert_eq!(app.route(), &Route::List);
        let requests = app.take_pending_requests();
        assert_eq!(list_queries(&requests).len(), 1);
    }

    #[test]
    fn test_stale_detail_response_ignored() {
        let mut app = loaded_app();
        app.navigate(Route::issue(1));
        app.update(key(KeyCode::Esc));
        assert_eq!(app.route(), &Route::List);

        app.handle_api_message(ApiMessage::IssueFetched {
            id: 1,
            result: Err(ApiError::NotFound("gone".to_string())),
        });
        assert_eq!(app.route(), &Route::List);
        assert!(app.detail_view().issue().is_none());
    }

    #[test]
    fn test_back_to_list_keeps_query_and_refetches() {
        let mut app = loaded_app();
        app.list_view_mut().set_filter(FilterKind::Status, "open");
        app.list_view_mut().set_page(2);
        app.take_pending_requests();

        app.navigate(Route::issue(1));
        app.update(key(KeyCode::Char('q')));

        assert_eq!(app.route(), &Route::List);
        assert!(!app.should_quit());
        assert!(app.list_view().issues().is_empty());
        let requests = app.take_pending_requests();
        let query = list_queries(&requests)[0];
        assert_eq!(query.status.as_deref(), Some("open"));
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn test_list_failure_is_silent() {
        let mut app = loaded_app();
        app.update(key(KeyCode::Char('r')));
        app.handle_api_message(ApiMessage::IssuesListed(Err(ApiError::ServerError(
            "HTTP 500".to_string(),
        ))));
        assert_eq!(app.route(), &Route::List);
        assert!(!app.list_view().is_loading());
        assert_eq!(app.list_view().issues().len(), 2);
        assert!(app.notifications().is_empty());
    }

    #[test]
    fn test_create_flow() {
        let mut app = loaded_app();
        app.update(key(KeyCode::Char('c')));
        for c in "New".chars() {
            app.update(key(KeyCode::Char(c)));
        }
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
        )));

        let requests = app.take_pending_requests();
        match requests.as_slice() {
            [ApiRequest::CreateIssue(fields)] => assert_eq!(fields.title, "New"),
            other => panic!("Expected CreateIssue, got {:?}", other),
        }

        app.handle_api_message(ApiMessage::IssueCreated(Ok(test_issue(26))));
        assert_eq!(app.list_view().mode(), ListMode::Browsing);
        assert_eq!(app.notifications().len(), 1);
        let requests = app.take_pending_requests();
        assert_eq!(list_queries(&requests)[0].page, Some(1));
    }

    #[test]
    fn test_update_reloads_same_page() {
        let mut app = loaded_app();
        app.update(key(KeyCode::Char('n')));
        app.handle_api_message(listed(vec![test_issue(11)], 25));
        app.take_pending_requests();

        app.update(key(KeyCode::Char('e')));
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
        )));
        let requests = app.take_pending_requests();
        assert!(matches!(
            requests.as_slice(),
            [ApiRequest::UpdateIssue { id: 11, .. }]
        ));

        app.handle_api_message(ApiMessage::IssueUpdated {
            id: 11,
            result: Ok(test_issue(11)),
        });
        let requests = app.take_pending_requests();
        assert_eq!(list_queries(&requests)[0].page, Some(2));
    }

    #[test]
    fn test_save_failure_keeps_form_open() {
        let mut app = loaded_app();
        app.update(key(KeyCode::Char('e')));
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
        )));
        app.take_pending_requests();

        app.handle_api_message(ApiMessage::IssueUpdated {
            id: 1,
            result: Err(ApiError::Validation("title required".to_string())),
        });
        assert_eq!(app.list_view().mode(), ListMode::Editing { id: 1 });
        assert!(!app.list_view().form().is_submitting());
        assert!(app.take_pending_requests().is_empty());
        assert!(app.notifications().is_empty());
    }

    #[test]
    fn test_view_survives_short_terminals() {
        for height in 1..=11 {
            let mut app = App::new(&Config::default());
            app.navigate(Route::List);
            app.handle_api_message(ApiMessage::IssuesListed(Err(ApiError::ServerError(
                "HTTP 500".to_string(),
            ))));

            let mut terminal =
                ratatui::Terminal::new(ratatui::backend::TestBackend::new(80, height)).unwrap();
            terminal.draw(|frame| app.view(frame)).unwrap();
        }
    }

    #[test]
    fn test_last_list_answer_wins() {
        let mut app = loaded_app();

        app.update(key(KeyCode::Char('n')));
        app.update(key(KeyCode::Char('n')));
        let requests = app.take_pending_requests();
        let pages: Vec<_> = list_queries(&requests).iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![Some(2), Some(3)]);

        // The page-3 answer arrives first, then the stale page-2 answer
        app.handle_api_message(listed(vec![test_issue(21), test_issue(22)], 25));
        app.handle_api_message(listed(vec![test_issue(11)], 24));

        let ids: Vec<_> = app.list_view().issues().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![11]);
        assert_eq!(app.list_view().total(), 24);
        assert!(!app.list_view().is_loading());
    }

    #[test]
    fn test_resize_and_tick() {
        let mut app = loaded_app();
        app.update(Event::Resize(100, 50));
        app.update(Event::Tick);
        assert!(!app.should_quit());
    }
}
