//! Application views (screens).

mod detail;
mod form;
mod list;

pub use detail::{DetailAction, DetailView};
pub use form::{FormAction, FormField, IssueForm};
pub use list::{FilterKind, ListAction, ListMode, ListView};
