//! Compose and draft handlers.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::{Draft, Post};
use quill_data::DataError;
use quill_flux::StateStore;
use tracing::info;

use super::{feed, helpers, QuillContext};
use crate::request::*;
use crate::state::*;

fn validate(title: &str, body: &str) -> Option<&'static str> {
    if title.trim().is_empty() {
        Some("Title cannot be empty")
    } else if body.trim().is_empty() {
        Some("Body cannot be empty")
    } else {
        None
    }
}

/// Publish the outcome of an upload. A created post triggers a feed sync so
/// it shows up in the cache.
async fn settle_publish(ctx: &QuillContext, store: &StateStore, result: Result<NetworkResult<Post>, DataError>) {
    let status = match result {
        Ok(NetworkResult::Success(post)) => {
            info!(post = %post.id, "post published");
            UiState::Success(post)
        }
        Ok(failure) => UiState::Error(helpers::failure_text(&failure)),
        Err(e) => UiState::Error(e.to_string()),
    };
    let published = status.data().is_some();
    store.set(ComposeState::PATH, ComposeState { status });
    if published {
        feed::sync(ctx, store).await;
    }
}

/// Handle `compose/publish`.
pub async fn publish(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: PublishReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    if let Some(problem) = validate(&req.title, &req.body) {
        store.set(ComposeState::PATH, ComposeState { status: UiState::Error(problem.into()) });
        return;
    }
    store.set(ComposeState::PATH, ComposeState { status: UiState::Loading });
    let result = ctx
        .posts
        .upload_post(req.title.trim(), req.body.trim(), user.id(), req.image_path.as_deref())
        .await;
    settle_publish(&ctx, &store, result).await;
}

fn drafts_list(result: Result<Vec<Draft>, DataError>) -> UiState<Vec<Draft>> {
    match result {
        Ok(drafts) => UiState::list(drafts),
        Err(e) => UiState::Error(e.to_string()),
    }
}

/// Handle `drafts/open`.
pub async fn open_drafts(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: OpenDraftsReq) {
    let mut rx = match ctx.drafts.watch() {
        Ok(rx) => rx,
        Err(e) => {
            store.update::<DraftsState, _>(DraftsState::PATH, |s| s.drafts = UiState::Error(e.to_string()));
            return;
        }
    };
    let drafts = rx.borrow_and_update().clone();
    store.update::<DraftsState, _>(DraftsState::PATH, |s| s.drafts = UiState::list(drafts));

    helpers::follow(&ctx, DraftsState::PATH, store, rx, |store, drafts| {
        store.update::<DraftsState, _>(DraftsState::PATH, |s| s.drafts = UiState::list(drafts));
    });
}

/// Handle `draft/save`.
pub async fn save_draft(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: SaveDraftReq) {
    let saved = match &req.id {
        Some(id) => match ctx.drafts.get(id) {
            Ok(Some(existing)) => ctx.drafts.update(&Draft {
                title: req.title.clone(),
                body: req.body.clone(),
                image_path: req.image_path.clone(),
                ..existing
            }),
            Ok(None) => Err(DataError::NotFound(format!("draft {}", id))),
            Err(e) => Err(e),
        },
        None => ctx.drafts.create(&req.title, &req.body, req.image_path.clone()),
    };
    match saved {
        Ok(draft) => {
            let drafts = drafts_list(ctx.drafts.list());
            store.update::<DraftsState, _>(DraftsState::PATH, |s| {
                s.drafts = drafts;
                s.last_saved = Some(draft);
            });
            helpers::notify(&store, "Draft saved");
        }
        Err(e) => helpers::notify(&store, e.to_string()),
    }
}

/// Handle `draft/delete`.
pub async fn delete_draft(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: DeleteDraftReq) {
    match ctx.drafts.delete(&req.id) {
        Ok(()) => {
            let drafts = drafts_list(ctx.drafts.list());
            store.update::<DraftsState, _>(DraftsState::PATH, |s| s.drafts = drafts);
            helpers::notify(&store, "Draft deleted");
        }
        Err(e) => helpers::notify(&store, e.to_string()),
    }
}

/// Handle `draft/publish`. The draft survives a failed upload.
pub async fn publish_draft(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: PublishDraftReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    store.set(ComposeState::PATH, ComposeState { status: UiState::Loading });
    let result = ctx.drafts.publish(&req.id, user.id()).await;
    let drafts = drafts_list(ctx.drafts.list());
    store.update::<DraftsState, _>(DraftsState::PATH, |s| s.drafts = drafts);
    settle_publish(&ctx, &store, result).await;
}
