//! Issue API request and response types.
//!
//! These types model the JSON exchanged with the issue service:
//! `GET /issues`, `GET /issues/{id}`, `POST /issues` and `PUT /issues/{id}`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default status for newly created issues.
pub const DEFAULT_STATUS: &str = "open";

/// Default priority for newly created issues.
pub const DEFAULT_PRIORITY: &str = "medium";

/// An issue as returned by the server.
///
/// `id`, `created_at` and `updated_at` are assigned by the server and are
/// never sent back by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Server-assigned identifier.
    pub id: u64,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Workflow status (e.g. "open").
    pub status: String,
    /// Priority (e.g. "medium").
    pub priority: String,
    /// Assignee name, may be empty.
    #[serde(default)]
    pub assignee: String,
    /// Creation timestamp, as the server formats it.
    pub created_at: String,
    /// Last update timestamp, as the server formats it.
    pub updated_at: String,
}

impl Issue {
    /// Copy the user-editable fields of this issue.
    pub fn editable_fields(&self) -> IssueFields {
        IssueFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            assignee: self.assignee.clone(),
        }
    }

    /// Get the value of a field as text.
    pub fn field_value(&self, field: IssueField) -> Cow<'_, str> {
        match field {
            IssueField::Id => Cow::Owned(self.id.to_string()),
            IssueField::Title => Cow::Borrowed(&self.title),
            IssueField::Description => Cow::Borrowed(&self.description),
            IssueField::Status => Cow::Borrowed(&self.status),
            IssueField::Priority => Cow::Borrowed(&self.priority),
            IssueField::Assignee => Cow::Borrowed(&self.assignee),
            IssueField::CreatedAt => Cow::Borrowed(&self.created_at),
            IssueField::UpdatedAt => Cow::Borrowed(&self.updated_at),
        }
    }
}

/// The fields a user may set when creating or editing an issue.
///
/// This is the body of `POST /issues` and the form buffer of the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFields {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
}

impl Default for IssueFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: DEFAULT_STATUS.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
            assignee: String::new(),
        }
    }
}

/// A partial update, the body of `PUT /issues/{id}`.
///
/// Only fields that are `Some` are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl IssueUpdate {
    /// Check if the update carries no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
    }
}

impl From<IssueFields> for IssueUpdate {
    fn from(fields: IssueFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            status: Some(fields.status),
            priority: Some(fields.priority),
            assignee: Some(fields.assignee),
        }
    }
}

/// A page of issues.
///
/// Returned by `GET /issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueList {
    /// The issues on the requested page.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Total number of issues matching the query, across all pages.
    pub total: u64,
    /// The page the server answered, if echoed.
    #[serde(default)]
    pub page: Option<u32>,
    /// The page size the server used, if echoed.
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// Whether the service reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Number of pages needed to show `total` items, `page_size` at a time.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// An issue attribute, used for sorting and for per-field lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueField {
    Id,
    Title,
    Description,
    Status,
    Priority,
    Assignee,
    CreatedAt,
    UpdatedAt,
}

impl IssueField {
    /// Columns shown in the issue table, in display order.
    pub const COLUMNS: [IssueField; 7] = [
        IssueField::Id,
        IssueField::Title,
        IssueField::Status,
        IssueField::Priority,
        IssueField::Assignee,
        IssueField::CreatedAt,
        IssueField::UpdatedAt,
    ];

    /// The attribute name the server sorts by.
    pub fn api_name(&self) -> &'static str {
        match self {
            IssueField::Id => "id",
            IssueField::Title => "title",
            IssueField::Description => "description",
            IssueField::Status => "status",
            IssueField::Priority => "priority",
            IssueField::Assignee => "assignee",
            IssueField::CreatedAt => "createdAt",
            IssueField::UpdatedAt => "updatedAt",
        }
    }

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueField::Id => "ID",
            IssueField::Title => "Title",
            IssueField::Description => "Description",
            IssueField::Status => "Status",
            IssueField::Priority => "Priority",
            IssueField::Assignee => "Assignee",
            IssueField::CreatedAt => "Created",
            IssueField::UpdatedAt => "Updated",
        }
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for `GET /issues`.
///
/// Every field is optional; unset and empty fields are left out of the
/// outbound query entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<IssueField>,
    pub sort_order: Option<SortOrder>,
}

impl IssueQuery {
    /// Build the query-string pairs for this query.
    ///
    /// Search is sent as typed and dropped when blank. Filters are dropped when
    /// empty. `sort_order` is only sent together with `sort_by`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.to_string()));
        }

        for (key, value) in [
            ("status", &self.status),
            ("priority", &self.priority),
            ("assignee", &self.assignee),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                params.push((key, value.to_string()));
            }
        }

        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            params.push(("page_size", page_size.to_string()));
        }

        if let Some(field) = self.sort_by {
            params.push(("sort_by", field.api_name().to_string()));
            params.push(("sort_order", self.sort_order.unwrap_or_default().to_string()));
        }

        params
    }
}
