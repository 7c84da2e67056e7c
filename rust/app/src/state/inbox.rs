//! Notifications and search: `notifications/state`, `search/state`.

use quill_core::{Notification, Post};

use super::ui::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationsState {
    pub notifications: UiState<Vec<Notification>>,
}

impl NotificationsState {
    pub const PATH: &'static str = "notifications/state";
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub query: String,
    pub results: UiState<Vec<Post>>,
}

impl SearchState {
    pub const PATH: &'static str = "search/state";
}
