//! Paged listings and comment mutations.
//!
//! Each listing keeps one [`Pager`] for the owner it was last opened for.
//! Opening it for another owner, or a `Refresh`, starts a new pager.

use std::any::Any;
use std::sync::Arc;

use quill_client::NetworkResult;
use quill_data::{
    CommentsSource, FollowersSource, FollowingSource, Pager, PagerState, PagingSource, ProfilePostsSource,
    RepliesSource,
};
use quill_flux::StateStore;
use tokio::sync::Mutex;
use tracing::debug;

use super::{helpers, QuillContext};
use crate::request::*;
use crate::state::*;

type Slot<S> = Mutex<Option<(String, Pager<S>)>>;

#[derive(Default)]
pub struct Pagers {
    followers: Slot<FollowersSource>,
    following: Slot<FollowingSource>,
    profile_posts: Slot<ProfilePostsSource>,
    comments: Slot<CommentsSource>,
    replies: Slot<RepliesSource>,
}

/// Run `action` on the listing at `path` and publish the result.
async fn drive<S>(
    slot: &Slot<S>,
    store: &StateStore,
    path: &str,
    owner_id: &str,
    action: PageAction,
    page_size: u32,
    source: impl FnOnce() -> S,
) where
    S: PagingSource,
    S::Item: Any,
{
    let mut guard = slot.lock().await;
    let reuse = action != PageAction::Refresh && matches!(&*guard, Some((owner, _)) if owner == owner_id);
    if !reuse {
        *guard = Some((owner_id.to_string(), Pager::new(source(), page_size)));
        store.set(path, ListState::<S::Item> {
            owner_id: owner_id.to_string(),
            items: UiState::Loading,
            complete: false,
            error: None,
        });
    }
    let Some((_, pager)) = guard.as_mut() else { return };

    let state = if !reuse || action == PageAction::Next {
        pager.load_next().await.clone()
    } else {
        pager.retry().await.clone()
    };

    let items = pager.items();
    let (items, error) = match state {
        PagerState::Error { message, .. } if items.is_empty() => (UiState::Error(message), None),
        PagerState::Error { message, key } => {
            debug!(%path, key, "keeping loaded pages after a failed page");
            (UiState::list(items), Some(message))
        }
        PagerState::Idle | PagerState::Complete => (UiState::list(items), None),
    };
    store.set(path, ListState {
        owner_id: owner_id.to_string(),
        items,
        complete: pager.is_complete(),
        error,
    });
}

/// Handle `followers/page`.
pub async fn followers(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: FollowersReq) {
    let remote = ctx.remote.clone();
    let id = req.user_id.clone();
    drive(&ctx.pagers.followers, &store, FollowersList::FOLLOWERS_PATH, &req.user_id, req.action, ctx.page_size, || {
        FollowersSource::new(remote, id)
    })
    .await;
}

/// Handle `following/page`.
pub async fn following(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: FollowingReq) {
    let remote = ctx.remote.clone();
    let id = req.user_id.clone();
    drive(&ctx.pagers.following, &store, FollowingList::FOLLOWING_PATH, &req.user_id, req.action, ctx.page_size, || {
        FollowingSource::new(remote, id)
    })
    .await;
}

/// Handle `profile/page`.
pub async fn profile_posts(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: ProfilePostsReq) {
    let remote = ctx.remote.clone();
    let id = req.user_id.clone();
    drive(&ctx.pagers.profile_posts, &store, ProfilePostsList::PATH, &req.user_id, req.action, ctx.page_size, || {
        ProfilePostsSource::new(remote, id)
    })
    .await;
}

/// Handle `comments/page`.
pub async fn comments(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: CommentsReq) {
    let remote = ctx.remote.clone();
    let id = req.post_id.clone();
    drive(&ctx.pagers.comments, &store, CommentsList::PATH, &req.post_id, req.action, ctx.page_size, || {
        CommentsSource::new(remote, id)
    })
    .await;
}

/// Handle `replies/page`.
pub async fn replies(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: RepliesReq) {
    let remote = ctx.remote.clone();
    let id = req.comment_id.clone();
    drive(&ctx.pagers.replies, &store, RepliesList::PATH, &req.comment_id, req.action, ctx.page_size, || {
        RepliesSource::new(remote, id)
    })
    .await;
}

/// Owner of the listing currently at `path`, if it is loaded.
fn open_owner<T: Any + Clone>(store: &StateStore, path: &str) -> Option<String> {
    store.get_as::<ListState<T>>(path).map(|s| s.owner_id)
}

/// Handle `comment/add`. The post's comment list reloads on success.
pub async fn add_comment(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: AddCommentReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    if req.body.trim().is_empty() {
        helpers::notify(&store, "Comment cannot be empty");
        return;
    }
    match ctx.comments.add_comment(&req.post_id, user.id(), req.body.trim()).await {
        NetworkResult::Success(_) => {
            helpers::notify(&store, "Comment posted");
            if open_owner::<quill_core::Comment>(&store, CommentsList::PATH).as_deref() == Some(req.post_id.as_str()) {
                let reload = CommentsReq { post_id: req.post_id, action: PageAction::Refresh };
                comments(ctx, store, reload).await;
            }
        }
        failure => helpers::notify(&store, helpers::failure_text(&failure)),
    }
}

/// Handle `comment/delete`. An open comment list reloads on success.
pub async fn delete_comment(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: DeleteCommentReq) {
    if helpers::require_user(&ctx, &store).is_none() {
        return;
    }
    match ctx.comments.delete_comment(&req.comment_id).await {
        NetworkResult::Success(()) => {
            helpers::notify(&store, "Comment deleted");
            if let Some(post_id) = open_owner::<quill_core::Comment>(&store, CommentsList::PATH) {
                comments(ctx, store, CommentsReq { post_id, action: PageAction::Refresh }).await;
            }
        }
        failure => helpers::notify(&store, helpers::failure_text(&failure)),
    }
}

/// Handle `reply/add`. The comment's reply list reloads on success.
pub async fn add_reply(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: AddReplyReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    if req.body.trim().is_empty() {
        helpers::notify(&store, "Reply cannot be empty");
        return;
    }
    match ctx.comments.add_reply(&req.comment_id, user.id(), req.body.trim()).await {
        NetworkResult::Success(_) => {
            helpers::notify(&store, "Reply posted");
            if open_owner::<quill_core::Reply>(&store, RepliesList::PATH).as_deref() == Some(req.comment_id.as_str()) {
                let reload = RepliesReq { comment_id: req.comment_id, action: PageAction::Refresh };
                replies(ctx, store, reload).await;
            }
        }
        failure => helpers::notify(&store, helpers::failure_text(&failure)),
    }
}
