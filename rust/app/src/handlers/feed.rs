//! Feed and saved-posts handlers.

use std::sync::Arc;

use quill_flux::StateStore;
use tracing::warn;

use super::{helpers, QuillContext};
use crate::request::*;
use crate::state::*;

/// Handle `feed/open`: publish the cached feed now and keep it current as
/// the cache, the saved ids or the session change.
pub async fn open_feed(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: OpenFeedReq) {
    let mut feed = match ctx.posts.get_all_posts() {
        Ok(feed) => feed,
        Err(e) => {
            warn!(error = %e, "feed unavailable");
            store.update::<FeedState, _>(FeedState::PATH, |s| s.posts = UiState::Error(e.to_string()));
            return;
        }
    };
    let posts = feed.current();
    store.update::<FeedState, _>(FeedState::PATH, |s| s.posts = UiState::list(posts));

    if !ctx.start_live(FeedState::PATH) {
        return;
    }
    ctx.scope.spawn(async move {
        while feed.changed().await {
            let posts = feed.current();
            store.update::<FeedState, _>(FeedState::PATH, |s| s.posts = UiState::list(posts));
        }
    });
}

pub(crate) const SYNC_FAILED: &str = "Could not refresh the feed";

/// Handle `feed/sync`.
pub async fn sync_feed(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: SyncFeedReq) {
    sync(&ctx, &store).await;
}

/// Replace the cache with the server feed. An open feed picks the new rows
/// up through its live subscription. Network failures keep the old cache.
pub(crate) async fn sync(ctx: &QuillContext, store: &StateStore) {
    store.update::<FeedState, _>(FeedState::PATH, |s| s.syncing = true);
    if let Err(e) = ctx.posts.sync_feed().await {
        warn!(error = %e, "feed sync failed locally");
        helpers::notify(store, SYNC_FAILED);
    }
    store.update::<FeedState, _>(FeedState::PATH, |s| s.syncing = false);
}

/// Handle `saved/open`.
pub async fn open_saved(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: OpenSavedReq) {
    let mut rx = match ctx.posts.get_saved_posts() {
        Ok(rx) => rx,
        Err(e) => {
            store.set(SavedState::PATH, SavedState { posts: UiState::Error(e.to_string()) });
            return;
        }
    };
    let posts = rx.borrow_and_update().clone();
    store.set(SavedState::PATH, SavedState { posts: UiState::list(posts) });

    helpers::follow(&ctx, SavedState::PATH, store, rx, |store, posts| {
        store.set(SavedState::PATH, SavedState { posts: UiState::list(posts) });
    });
}
