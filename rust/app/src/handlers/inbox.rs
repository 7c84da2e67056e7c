//! Notifications and search handlers.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_flux::StateStore;

use super::{helpers, QuillContext};
use crate::request::*;
use crate::state::*;

/// Handle `notifications/load`.
pub async fn load_notifications(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: LoadNotificationsReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    store.set(NotificationsState::PATH, NotificationsState { notifications: UiState::Loading });

    let notifications = match ctx.notifications.fetch(user.id()).await {
        NetworkResult::Success(list) => UiState::list(list),
        failure => UiState::Error(helpers::failure_text(&failure)),
    };
    store.set(NotificationsState::PATH, NotificationsState { notifications });
}

/// Handle `search/query`. A blank query clears the results without a
/// request.
pub async fn search(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: SearchReq) {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        store.set(SearchState::PATH, SearchState { query, results: UiState::Idle });
        return;
    }
    store.set(SearchState::PATH, SearchState { query: query.clone(), results: UiState::Loading });

    let results = match ctx.posts.search(&query).await {
        NetworkResult::Success(posts) => UiState::list(posts),
        failure => UiState::Error(helpers::failure_text(&failure)),
    };
    // A newer query may have replaced this one while the request was out.
    store.update::<SearchState, _>(SearchState::PATH, |s| {
        if s.query == query {
            s.results = results;
        }
    });
}
