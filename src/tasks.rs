//! Async task management for non-blocking API operations.
//!
//! Each request runs as its own tokio task and reports back through an
//! unbounded channel that the main loop drains every tick:
//! 1. The app queues an [`ApiRequest`] instead of awaiting inline
//! 2. The main loop hands it to [`TaskSpawner::spawn`]
//! 3. The task performs one HTTP round trip
//! 4. The result comes back as an [`ApiMessage`] via `try_recv()`
//!
//! Requests are never cancelled or de-duplicated. When several list requests
//! overlap, whichever answer arrives last is the one the list shows.

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::types::{Issue, IssueFields, IssueList, IssueQuery, IssueUpdate};
use crate::api::{ApiError, IssueClient};

/// A request queued by the application for the task spawner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Load one page of issues.
    ListIssues(IssueQuery),
    /// Load a single issue.
    GetIssue(u64),
    /// Create an issue from the form buffer.
    CreateIssue(IssueFields),
    /// Update an issue from the form buffer.
    UpdateIssue { id: u64, update: IssueUpdate },
}

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// A page of issues arrived, or the list request failed.
    IssuesListed(Result<IssueList, ApiError>),

    /// A single issue arrived, or the lookup failed.
    IssueFetched {
        id: u64,
        result: Result<Issue, ApiError>,
    },

    /// Create result.
    IssueCreated(Result<Issue, ApiError>),

    /// Update result.
    IssueUpdated {
        id: u64,
        result: Result<Issue, ApiError>,
    },
}

/// Spawns background tasks for API requests.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task for the given request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, client: &IssueClient, request: ApiRequest) {
        debug!(?request, "Spawning API task");

        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let message = execute(&client, request).await;
            let _ = tx.send(message);
        });
    }
}

/// Run one request to completion.
pub async fn execute(client: &IssueClient, request: ApiRequest) -> ApiMessage {
    match request {
        ApiRequest::ListIssues(query) => ApiMessage::IssuesListed(client.list_issues(&query).await),
        ApiRequest::GetIssue(id) => ApiMessage::IssueFetched {
            id,
            result: client.get_issue(id).await,
        },
        ApiRequest::CreateIssue(fields) => {
            ApiMessage::IssueCreated(client.create_issue(&fields).await)
        }
        ApiRequest::UpdateIssue { id, update } => ApiMessage::IssueUpdated {
            id,
            result: client.update_issue(id, &update).await,
        },
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}
