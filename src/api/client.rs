//! Issue service client implementation.
//!
//! This module provides the client for the issue service's REST API. It
//! handles request construction, response decoding and error mapping. Every
//! call is a single round trip; failures are returned to the caller as-is.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{HealthStatus, Issue, IssueFields, IssueList, IssueQuery, IssueUpdate};
use crate::config::ServerSettings;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The issue service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct IssueClient {
    /// The HTTP client.
    client: Client,
    /// The service base URL, without a trailing slash.
    base_url: String,
}

impl IssueClient {
    /// Create a client from server settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the HTTP client cannot be
    /// built.
    #[instrument(skip(server), fields(url = %server.url))]
    pub fn new(server: &ServerSettings) -> Result<Self> {
        info!("Creating issue client");
        Self::with_timeout(&server.url, Duration::from_secs(server.timeout_secs))
    }

    /// Create a client for the given base URL with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Check that the service is reachable.
    ///
    /// Calls `GET /health`.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let status: HealthStatus = self.get(&url, &[]).await.map_err(|e| match e {
            ApiError::Network(_) => {
                ApiError::ConnectionFailed(format!("Cannot connect to {}: {}", self.base_url, e))
            }
            other => other,
        })?;

        debug!(status = %status.status, "Health check answered");
        Ok(status)
    }

    /// List one page of issues.
    ///
    /// Calls `GET /issues` with only the query keys that carry a value.
    #[instrument(skip(self, query))]
    pub async fn list_issues(&self, query: &IssueQuery) -> Result<IssueList> {
        let params = query.to_params();
        debug!(?params, "Listing issues");

        let url = format!("{}/issues", self.base_url);
        let list: IssueList = self.get(&url, &params).await?;

        debug!(count = list.issues.len(), total = list.total, "Listed issues");
        Ok(list)
    }

    /// Get a single issue by id.
    #[instrument(skip(self))]
    pub async fn get_issue(&self, id: u64) -> Result<Issue> {
        debug!("Fetching issue");

        let url = format!("{}/issues/{}", self.base_url, id);
        let issue: Issue = self.get(&url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound(format!("Issue {} not found", id))
            } else {
                e
            }
        })?;

        debug!(title = %issue.title, "Fetched issue");
        Ok(issue)
    }

    /// Create an issue.
    ///
    /// The server assigns the id and timestamps and returns the full issue.
    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub async fn create_issue(&self, fields: &IssueFields) -> Result<Issue> {
        let url = format!("{}/issues", self.base_url);
        let issue: Issue = self.send_json(self.client.post(&url), fields).await?;

        info!(id = issue.id, "Created issue");
        Ok(issue)
    }

    /// Update an issue with a partial set of editable fields.
    #[instrument(skip(self, update))]
    pub async fn update_issue(&self, id: u64, update: &IssueUpdate) -> Result<Issue> {
        if update.is_empty() {
            warn!("Sending an update with no fields");
        }

        let url = format!("{}/issues/{}", self.base_url, id);
        let issue: Issue = self.send_json(self.client.put(&url), update).await.map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound(format!("Issue {} not found", id))
            } else {
                e
            }
        })?;

        info!("Updated issue");
        Ok(issue)
    }

    /// Perform a GET request with query parameters.
    async fn get<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Send a JSON body with the given request builder.
    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<T> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!(%status, "Error response body: {}", error_body);

            Err(error_from_response(status, &url, &error_body))
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Create an appropriate error from an HTTP response.
///
/// The service reports errors as `{"detail": "..."}`, or for rejected bodies
/// as `{"detail": [{"msg": "...", ...}]}`.
fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("detail").cloned())
        .and_then(|detail| match detail {
            serde_json::Value::String(message) => Some(message),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                (!messages.is_empty()).then(|| messages.join(", "))
            }
            _ => None,
        });

    ApiError::from_status(status, detail.as_deref().unwrap_or(url))
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if url.starts_with("http://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn test_normalize_base_url_handles_multiple_slashes() {
        assert_eq!(
            normalize_base_url("https://issues.example.com///"),
            "https://issues.example.com"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://example.com/api/"),
            "https://example.com/api"
        );
    }

    #[test]
    fn test_with_base_url_rejects_missing_scheme() {
        let err = IssueClient::with_base_url("localhost:8000").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_new_from_server_settings() {
        let server = ServerSettings::default();
        let client = IssueClient::new(&server).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_error_from_response_detail_string() {
        let err = error_from_response(
            StatusCode::NOT_FOUND,
            "http://localhost:8000/issues/9",
            r#"{"detail": "Issue not found"}"#,
        );
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Issue not found"),
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_error_from_response_detail_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "title"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "status"], "msg": "str type expected", "type": "type_error.str"}
        ]}"#;
        let err = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, "url", body);
        match err {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "field required, str type expected")
            }
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn test_error_from_response_falls_back_to_url() {
        let err = error_from_response(
            StatusCode::BAD_GATEWAY,
            "http://localhost:8000/issues",
            "<html>bad gateway</html>",
        );
        assert!(err.to_string().contains("http://localhost:8000/issues"));
    }
}
