//! Issue service API client and types.
//!
//! This module provides the interface for communicating with the issue
//! service's REST API.

mod client;
pub mod error;
pub mod types;

pub use client::{IssueClient, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use types::{
    total_pages, HealthStatus, Issue, IssueField, IssueFields, IssueList, IssueQuery,
    IssueUpdate, SortOrder,
};
