//! Handler implementations and Flux wiring.
//!
//! Every handler has the shape
//! `async fn(Arc<QuillContext>, Arc<StateStore>, Req)`; `register_handlers`
//! binds each one to its request's path and downcasts the payload.

pub mod auth;
pub mod compose;
pub mod feed;
pub mod helpers;
pub mod inbox;
pub mod listing;
pub mod post;
pub mod user;

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

use quill_data::{
    CommentRepository, DraftRepository, LocalDb, NotificationRepository, PostRepository, RemoteDataSource,
    Session, UserRepository,
};
use quill_flux::{Flux, StateStore, TaskScope};
use tracing::warn;

use crate::request::Request;

/// Everything the handlers reach: repositories, the session and the scope
/// that owns background work for this app instance.
pub struct QuillContext {
    pub posts: Arc<PostRepository>,
    pub users: UserRepository,
    pub comments: CommentRepository,
    pub notifications: NotificationRepository,
    pub drafts: DraftRepository,
    pub session: Arc<Session>,
    pub page_size: u32,
    pub(crate) remote: Arc<dyn RemoteDataSource>,
    pub(crate) scope: TaskScope,
    pub(crate) pagers: listing::Pagers,
    live: Mutex<HashSet<&'static str>>,
}

impl QuillContext {
    pub fn new(remote: Arc<dyn RemoteDataSource>, local: LocalDb, session: Arc<Session>, page_size: u32) -> Self {
        let posts = Arc::new(PostRepository::new(remote.clone(), local.clone(), session.clone()));
        Self {
            users: UserRepository::new(remote.clone(), local.clone(), session.clone()),
            comments: CommentRepository::new(remote.clone()),
            notifications: NotificationRepository::new(remote.clone()),
            drafts: DraftRepository::new(local.drafts.clone(), posts.clone()),
            posts,
            session,
            page_size,
            remote,
            scope: TaskScope::new("quill-app"),
            pagers: listing::Pagers::default(),
            live: Mutex::new(HashSet::new()),
        }
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    /// Claim the live subscription for `path`. Only the first caller gets
    /// true; later opens reuse the running subscription.
    pub(crate) fn start_live(&self, path: &'static str) -> bool {
        !self.scope.is_closed() && self.live.lock().unwrap_or_else(|e| e.into_inner()).insert(path)
    }
}

/// Bind a handler to `R::PATH`.
fn route<R, F, Fut>(flux: &Flux, ctx: &Arc<QuillContext>, handler: F)
where
    R: Request,
    F: Fn(Arc<QuillContext>, Arc<StateStore>, R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let ctx = ctx.clone();
    flux.on(R::PATH, move |path, payload, store: Arc<StateStore>| {
        let fut = payload
            .downcast_ref::<R>()
            .cloned()
            .map(|req| handler(ctx.clone(), store, req));
        async move {
            match fut {
                Some(fut) => fut.await,
                None => warn!(%path, "payload does not match the request type"),
            }
        }
    });
}

/// Register every handler with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<QuillContext>) {
    let ctx = &ctx;

    // app
    route(flux, ctx, auth::initialize);
    route(flux, ctx, feed::open_feed);
    route(flux, ctx, feed::sync_feed);
    route(flux, ctx, feed::open_saved);
    route(flux, ctx, inbox::load_notifications);
    route(flux, ctx, inbox::search);

    // auth
    route(flux, ctx, auth::login);
    route(flux, ctx, auth::register);
    route(flux, ctx, auth::logout);

    // post
    route(flux, ctx, post::open_post);
    route(flux, ctx, post::like);
    route(flux, ctx, post::unlike);
    route(flux, ctx, post::save);
    route(flux, ctx, post::unsave);
    route(flux, ctx, post::delete);

    // user
    route(flux, ctx, user::follow);
    route(flux, ctx, user::unfollow);
    route(flux, ctx, user::load_profile);

    // listings
    route(flux, ctx, listing::followers);
    route(flux, ctx, listing::following);
    route(flux, ctx, listing::profile_posts);
    route(flux, ctx, listing::comments);
    route(flux, ctx, listing::replies);
    route(flux, ctx, listing::add_comment);
    route(flux, ctx, listing::delete_comment);
    route(flux, ctx, listing::add_reply);

    // compose
    route(flux, ctx, compose::publish);
    route(flux, ctx, compose::open_drafts);
    route(flux, ctx, compose::save_draft);
    route(flux, ctx, compose::delete_draft);
    route(flux, ctx, compose::publish_draft);
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use quill_client::SessionToken;
    use quill_data::testing::{session_user, FakeRemote, MemoryKv};
    use quill_data::{LocalDb, Session};

    use crate::app::QuillApp;
    use crate::handlers::QuillContext;

    pub struct Harness {
        pub remote: Arc<FakeRemote>,
        pub local: LocalDb,
        pub session: Arc<Session>,
        pub app: QuillApp,
    }

    pub fn harness() -> Harness {
        harness_on(LocalDb::open_in_memory().unwrap())
    }

    /// A harness over a caller-built local database.
    pub fn harness_on(local: LocalDb) -> Harness {
        let remote = Arc::new(FakeRemote::new());
        let session = Arc::new(Session::load(Arc::new(MemoryKv::default()), Arc::new(SessionToken::new())).unwrap());
        let ctx = QuillContext::new(remote.clone(), local.clone(), session.clone(), 20);
        Harness { remote, local, session, app: QuillApp::new(ctx) }
    }

    /// A harness with `user_id` already signed in.
    pub fn signed_in(user_id: &str) -> Harness {
        let h = harness();
        h.session.set(session_user(user_id)).unwrap();
        h
    }

    /// Poll `check` until it holds or a second has passed. Live
    /// subscriptions update state from spawned tasks.
    pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }
}
