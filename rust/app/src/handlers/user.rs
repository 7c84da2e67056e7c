//! Follow and profile handlers.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_flux::StateStore;

use super::{helpers, listing, QuillContext};
use crate::request::*;
use crate::state::*;

/// Shift the follower count of an open profile after a follow toggle.
fn adjust_followers(store: &StateStore, user_id: &str, following: bool) {
    store.update::<ProfileState, _>(ProfileState::PATH, |s| {
        if s.user_id != user_id {
            return;
        }
        if let Some(user) = s.user.data_mut() {
            user.follower_count = if following {
                user.follower_count + 1
            } else {
                user.follower_count.saturating_sub(1)
            };
        }
    });
}

async fn toggle_follow(ctx: &QuillContext, store: &StateStore, user_id: &str, follow: bool) {
    let Some(me) = helpers::require_user(ctx, store) else { return };
    if me.id() == user_id {
        helpers::notify(store, "You cannot follow yourself");
        return;
    }
    let result = if follow {
        ctx.posts.follow_user(me.id(), user_id).await
    } else {
        ctx.posts.unfollow_user(me.id(), user_id).await
    };
    match result {
        NetworkResult::Success(()) => {
            adjust_followers(store, user_id, follow);
            let verb = if follow { "Following" } else { "Unfollowed" };
            helpers::notify(store, format!("{} {}", verb, user_id));
        }
        failure => helpers::notify(store, helpers::failure_text(&failure)),
    }
}

/// Handle `user/follow`.
pub async fn follow(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: FollowUserReq) {
    toggle_follow(&ctx, &store, &req.user_id, true).await;
}

/// Handle `user/unfollow`.
pub async fn unfollow(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: UnfollowUserReq) {
    toggle_follow(&ctx, &store, &req.user_id, false).await;
}

/// Handle `profile/load`: the header, then the first page of posts.
pub async fn load_profile(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: LoadProfileReq) {
    let is_self = ctx.session.user_id().as_deref() == Some(req.user_id.as_str());
    store.set(ProfileState::PATH, ProfileState {
        user_id: req.user_id.clone(),
        user: UiState::Loading,
        is_self,
    });

    let user = match ctx.users.fetch_profile(&req.user_id).await {
        NetworkResult::Success(user) => UiState::Success(user),
        failure => UiState::Error(helpers::failure_text(&failure)),
    };
    let loaded = user.data().is_some();
    store.set(ProfileState::PATH, ProfileState { user_id: req.user_id.clone(), user, is_self });

    if loaded {
        let posts = ProfilePostsReq { user_id: req.user_id, action: PageAction::Refresh };
        listing::profile_posts(ctx, store, posts).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;

    #[tokio::test]
    async fn profile_loads_header_and_first_posts_page() {
        let h = signed_in("me");
        h.remote.set_listing_size(3);
        h.app.send(LoadProfileReq { user_id: "carol".into() }).await;

        let profile = h.app.get::<ProfileState>(ProfileState::PATH).unwrap();
        assert_eq!(profile.user.data().unwrap().username, "carol");
        assert!(!profile.is_self);

        let posts = h.app.get::<ProfilePostsList>(ProfilePostsList::PATH).unwrap();
        assert_eq!(posts.items.items().len(), 3);
        assert!(posts.items.items().iter().all(|p| p.author_id == "carol"));
    }

    #[tokio::test]
    async fn own_profile_is_marked() {
        let h = signed_in("me");
        h.app.send(LoadProfileReq { user_id: "me".into() }).await;
        assert!(h.app.get::<ProfileState>(ProfileState::PATH).unwrap().is_self);
    }

    #[tokio::test]
    async fn failed_profile_skips_posts() {
        let h = harness();
        h.remote.set_reject(true);
        h.app.send(LoadProfileReq { user_id: "carol".into() }).await;

        let profile = h.app.get::<ProfileState>(ProfileState::PATH).unwrap();
        assert_eq!(profile.user.error(), Some("server error"));
        assert!(h.remote.calls_to("user_posts").is_empty());
    }

    #[tokio::test]
    async fn follow_bumps_open_profile() {
        let h = signed_in("me");
        h.app.send(LoadProfileReq { user_id: "carol".into() }).await;

        h.app.send(FollowUserReq { user_id: "carol".into() }).await;
        let profile = h.app.get::<ProfileState>(ProfileState::PATH).unwrap();
        assert_eq!(profile.user.data().unwrap().follower_count, 1);

        h.app.send(UnfollowUserReq { user_id: "carol".into() }).await;
        let profile = h.app.get::<ProfileState>(ProfileState::PATH).unwrap();
        assert_eq!(profile.user.data().unwrap().follower_count, 0);
        assert_eq!(h.remote.calls_to("follow"), vec!["follow:me:carol"]);
    }

    #[tokio::test]
    async fn failed_follow_is_reported() {
        let h = signed_in("me");
        h.remote.set_offline(true);
        h.app.send(FollowUserReq { user_id: "carol".into() }).await;
        assert!(h.app.get::<AppMessage>(AppMessage::PATH).is_some());
    }

    #[tokio::test]
    async fn self_follow_is_refused() {
        let h = signed_in("me");
        h.app.send(FollowUserReq { user_id: "me".into() }).await;
        assert!(h.remote.calls().is_empty());
    }
}
