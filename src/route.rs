//! Navigation routes.
//!
//! The application has two screens, addressed the way a URL router would
//! address them: `/issues` for the list and `/issues/:id` for one issue.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Path of the issue list.
pub const ISSUES_PATH: &str = "/issues";

/// Errors from parsing a navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The path names no screen.
    #[error("Unknown route: {0}")]
    Unknown(String),
}

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// The issue list.
    #[default]
    List,
    /// One issue, by the raw `:id` path segment.
    ///
    /// The segment is kept unparsed; the detail view decides whether it is a
    /// usable identifier.
    Detail(String),
}

impl Route {
    /// Parse a navigation path.
    ///
    /// The empty path and `/` redirect to the list.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        let stripped = trimmed.trim_end_matches('/');

        if stripped.is_empty() || stripped == ISSUES_PATH {
            return Ok(Route::List);
        }

        match stripped.strip_prefix(ISSUES_PATH).and_then(|rest| rest.strip_prefix('/')) {
            Some(segment) if !segment.contains('/') => Ok(Route::Detail(segment.to_string())),
            _ => Err(RouteError::Unknown(trimmed.to_string())),
        }
    }

    /// The route for one issue.
    pub fn issue(id: u64) -> Self {
        Route::Detail(id.to_string())
    }

    /// Render the route as a path.
    pub fn path(&self) -> String {
        match self {
            Route::List => ISSUES_PATH.to_string(),
            Route::Detail(segment) => format!("{}/{}", ISSUES_PATH, segment),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Parse an issue identifier from a `:id` path segment.
///
/// Returns `None` for anything that is not a positive integer.
pub fn parse_issue_id(segment: &str) -> Option<u64> {
    segment.trim().parse::<u64>().ok().filter(|id| *id != 0)
}
