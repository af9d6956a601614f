//! User interface components and views.
//!
//! This module contains all TUI rendering logic, including views for the two
//! screens and reusable UI components.

mod components;
pub mod theme;
mod views;

pub use components::{LoadingIndicator, Notification, NotificationManager, TextInput};
pub use views::{
    DetailAction, DetailView, FilterKind, FormAction, FormField, IssueForm, ListAction, ListMode,
    ListView,
};
