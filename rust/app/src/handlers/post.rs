//! Post handlers: detail, likes, saves, deletion.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::{Post, SessionUser};
use quill_data::{repository::compose_feed, DataError, FeedPost};
use quill_flux::StateStore;
use tracing::{debug, warn};

use super::{helpers, QuillContext};
use crate::request::*;
use crate::state::*;

/// Overlay saved/liked/own flags on a post for the detail screen.
fn detail_view(ctx: &QuillContext, post: Post, user: Option<&SessionUser>) -> Result<FeedPost, DataError> {
    let saved = ctx.posts.get_saved_post_ids()?.borrow().clone();
    let is_liked = match user {
        Some(u) => ctx.posts.is_post_liked(u.id(), &post.id)?,
        None => false,
    };
    let mut view = compose_feed(std::slice::from_ref(&post), &saved, user)
        .pop()
        .unwrap_or(FeedPost { post, is_saved: false, is_liked: false, is_own: false, can_interact: false });
    view.is_liked = is_liked;
    Ok(view)
}

/// Handle `post/open`. A signed-in viewer also records a view.
pub async fn open_post(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: OpenPostReq) {
    store.set(PostDetail::PATH, PostDetail { post_id: req.post_id.clone(), post: UiState::Loading });

    let user = ctx.session.current();
    let state = match ctx.posts.get_post_by_id(&req.post_id).await {
        Ok(Some(post)) => match detail_view(&ctx, post, user.as_ref()) {
            Ok(view) => UiState::Success(view),
            Err(e) => UiState::Error(e.to_string()),
        },
        Ok(None) => UiState::Empty,
        Err(e) => {
            warn!(post = %req.post_id, error = %e, "post lookup failed");
            UiState::Error(e.to_string())
        }
    };
    let found = state.data().is_some();
    store.set(PostDetail::PATH, PostDetail { post_id: req.post_id.clone(), post: state });

    // The detail is already visible; the view count is best effort.
    if let (true, Some(user)) = (found, user) {
        ctx.posts.add_view(user.id(), &req.post_id).await;
    }
}

/// Result of a like toggle: on success the detail screen flips the flag and
/// adjusts the counter; on failure the server message is shown.
fn settle_like(store: &StateStore, post_id: &str, liked: bool, result: Result<NetworkResult<()>, DataError>) {
    match result {
        Ok(NetworkResult::Success(())) => {
            store.update::<PostDetail, _>(PostDetail::PATH, |d| {
                d.patch(post_id, |p| {
                    if p.is_liked != liked {
                        p.is_liked = liked;
                        p.post.like_count = if liked {
                            p.post.like_count + 1
                        } else {
                            p.post.like_count.saturating_sub(1)
                        };
                    }
                })
            });
        }
        Ok(failure) => {
            debug!(post = %post_id, liked, "like toggle rejected");
            helpers::notify(store, helpers::failure_text(&failure));
        }
        Err(e) => helpers::notify(store, e.to_string()),
    }
}

/// Handle `post/like`.
pub async fn like(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: LikePostReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    let result = ctx.posts.like_post(user.id(), &req.post_id).await;
    settle_like(&store, &req.post_id, true, result);
}

/// Handle `post/unlike`.
pub async fn unlike(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: UnlikePostReq) {
    let Some(user) = helpers::require_user(&ctx, &store) else { return };
    let result = ctx.posts.unlike_post(user.id(), &req.post_id).await;
    settle_like(&store, &req.post_id, false, result);
}

/// Handle `post/save`. Saving is local only; the post is looked up the same
/// way the detail screen does.
pub async fn save(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: SavePostReq) {
    let post = match ctx.posts.get_post_by_id(&req.post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            helpers::notify(&store, "Post not found");
            return;
        }
        Err(e) => {
            helpers::notify(&store, e.to_string());
            return;
        }
    };
    match ctx.posts.insert_saved_post(&post) {
        Ok(()) => {
            store.update::<PostDetail, _>(PostDetail::PATH, |d| d.patch(&req.post_id, |p| p.is_saved = true));
            helpers::notify(&store, "Saved");
        }
        Err(e) => helpers::notify(&store, e.to_string()),
    }
}

/// Handle `post/unsave`.
pub async fn unsave(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: UnsavePostReq) {
    match ctx.posts.delete_saved_post_by_id(&req.post_id) {
        Ok(()) => {
            store.update::<PostDetail, _>(PostDetail::PATH, |d| d.patch(&req.post_id, |p| p.is_saved = false));
            helpers::notify(&store, "Removed from saved");
        }
        Err(e) => helpers::notify(&store, e.to_string()),
    }
}

/// Handle `post/delete`.
pub async fn delete(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: DeletePostReq) {
    if helpers::require_user(&ctx, &store).is_none() {
        return;
    }
    match ctx.posts.delete_post(&req.post_id).await {
        Ok(NetworkResult::Success(())) => {
            let open = store
                .get_as::<PostDetail>(PostDetail::PATH)
                .map(|d| d.post_id == req.post_id)
                .unwrap_or(false);
            if open {
                store.remove(PostDetail::PATH);
            }
            helpers::notify(&store, "Post deleted");
        }
        Ok(failure) => helpers::notify(&store, helpers::failure_text(&failure)),
        Err(e) => helpers::notify(&store, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;
    use quill_data::testing::{post, post_dto};

    fn detail(h: &Harness) -> PostDetail {
        h.app.get::<PostDetail>(PostDetail::PATH).unwrap()
    }

    fn message(h: &Harness) -> Option<String> {
        h.app.get::<AppMessage>(AppMessage::PATH).map(|m| m.0)
    }

    #[tokio::test]
    async fn open_post_overlays_like_mirror() {
        let h = signed_in("u1");
        h.local.cached.insert(&post("1", "A")).unwrap();
        h.local.likes.insert("u1", "1").unwrap();

        h.app.send(OpenPostReq { post_id: "1".into() }).await;
        let view = detail(&h).post.data().cloned().unwrap();
        assert!(view.is_liked);
        assert!(!view.is_saved);
        assert!(view.can_interact);
    }

    #[tokio::test]
    async fn open_post_records_a_view_for_signed_in_users() {
        let h = signed_in("u1");
        h.remote.add_post(post_dto("9", "Remote"));
        h.app.send(OpenPostReq { post_id: "9".into() }).await;

        assert_eq!(detail(&h).post.data().unwrap().post.title, "Remote");
        assert_eq!(h.remote.calls_to("add_view"), vec!["add_view:u1:9"]);
    }

    #[tokio::test]
    async fn anonymous_open_records_no_view() {
        let h = harness();
        h.local.cached.insert(&post("1", "A")).unwrap();
        h.app.send(OpenPostReq { post_id: "1".into() }).await;

        let view = detail(&h).post.data().cloned().unwrap();
        assert!(!view.can_interact);
        assert!(h.remote.calls_to("add_view").is_empty());
    }

    #[tokio::test]
    async fn unknown_post_is_empty() {
        let h = harness();
        h.app.send(OpenPostReq { post_id: "404".into() }).await;
        assert_eq!(detail(&h).post, UiState::Empty);
    }

    #[tokio::test]
    async fn like_flips_detail_and_counter() {
        let h = signed_in("u1");
        h.local.cached.insert(&post("1", "A")).unwrap();
        h.app.send(OpenPostReq { post_id: "1".into() }).await;

        h.app.send(LikePostReq { post_id: "1".into() }).await;
        let view = detail(&h).post.data().cloned().unwrap();
        assert!(view.is_liked);
        assert_eq!(view.post.like_count, 1);
        assert!(h.local.likes.is_liked("u1", "1").unwrap());

        h.app.send(UnlikePostReq { post_id: "1".into() }).await;
        let view = detail(&h).post.data().cloned().unwrap();
        assert!(!view.is_liked);
        assert_eq!(view.post.like_count, 0);
    }

    #[tokio::test]
    async fn failed_like_is_reported() {
        let h = signed_in("u1");
        h.remote.set_reject(true);
        h.app.send(LikePostReq { post_id: "1".into() }).await;

        assert_eq!(message(&h).as_deref(), Some("server error"));
        assert!(!h.local.likes.is_liked("u1", "1").unwrap());
    }

    #[tokio::test]
    async fn like_requires_sign_in() {
        let h = harness();
        h.app.send(LikePostReq { post_id: "1".into() }).await;
        assert_eq!(message(&h).as_deref(), Some(helpers::SIGN_IN_REQUIRED));
        assert!(h.remote.calls().is_empty());
    }

    #[tokio::test]
    async fn save_and_unsave_update_detail() {
        let h = harness();
        h.local.cached.insert(&post("1", "A")).unwrap();
        h.app.send(OpenPostReq { post_id: "1".into() }).await;

        h.app.send(SavePostReq { post_id: "1".into() }).await;
        assert!(detail(&h).post.data().unwrap().is_saved);
        assert!(h.local.saved.get("1").unwrap().is_some());

        h.app.send(UnsavePostReq { post_id: "1".into() }).await;
        assert!(!detail(&h).post.data().unwrap().is_saved);
        assert!(h.local.saved.get("1").unwrap().is_none());
    }

    #[tokio::test]
    async fn saving_an_unknown_post_is_reported() {
        let h = harness();
        h.app.send(SavePostReq { post_id: "404".into() }).await;
        assert_eq!(message(&h).as_deref(), Some("Post not found"));
    }

    #[tokio::test]
    async fn delete_closes_open_detail() {
        let h = signed_in("u1");
        h.local.cached.insert(&post("1", "A")).unwrap();
        h.app.send(OpenPostReq { post_id: "1".into() }).await;

        h.app.send(DeletePostReq { post_id: "1".into() }).await;
        assert!(h.app.get::<PostDetail>(PostDetail::PATH).is_none());
        assert!(h.local.cached.get("1").unwrap().is_none());
        assert_eq!(message(&h).as_deref(), Some("Post deleted"));
    }
}
