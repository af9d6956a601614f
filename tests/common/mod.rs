//! Shared helpers for the HTTP-level tests.

use issuedesk::api::IssueClient;
use serde_json::{json, Value};
use wiremock::MockServer;

/// An issue as the service returns it.
pub fn issue_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Steps to reproduce",
        "status": "open",
        "priority": "high",
        "assignee": "alice",
        "createdAt": "2024-03-01T09:15:30.123456",
        "updatedAt": "2024-03-01T09:15:30.123456"
    })
}

/// A mock service and a client pointed at it.
pub async fn setup() -> (MockServer, IssueClient) {
    let server = MockServer::start().await;
    let client = IssueClient::with_base_url(&server.uri()).expect("Failed to create client");
    (server, client)
}
