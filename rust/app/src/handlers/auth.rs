//! Auth handlers.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::SessionUser;
use quill_data::DataError;
use quill_flux::StateStore;
use tracing::warn;

use super::{feed, helpers, QuillContext};
use crate::request::*;
use crate::state::*;

/// Handle `app/initialize`.
pub async fn initialize(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: InitializeReq) {
    let auth = match ctx.session.current() {
        Some(user) => AuthState::signed_in(user),
        None => AuthState::default(),
    };
    store.set(AuthState::PATH, auth);
}

fn busy(store: &StateStore) {
    store.set(AuthState::PATH, AuthState { user: None, busy: true, error: None });
}

/// Publish the outcome of a login/register call. Returns true when the
/// user is now signed in.
fn settle(store: &StateStore, result: Result<NetworkResult<SessionUser>, DataError>) -> bool {
    let error = match result {
        Ok(NetworkResult::Success(user)) => {
            store.set(AuthState::PATH, AuthState::signed_in(user));
            return true;
        }
        Ok(failure) => helpers::failure_text(&failure),
        Err(e) => {
            warn!(error = %e, "could not persist session");
            e.to_string()
        }
    };
    store.set(AuthState::PATH, AuthState { user: None, busy: false, error: Some(error) });
    false
}

/// Handle `auth/login`. A successful login refreshes the feed.
pub async fn login(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: LoginReq) {
    if req.username.trim().is_empty() || req.password.is_empty() {
        store.set(AuthState::PATH, AuthState {
            user: None,
            busy: false,
            error: Some("Username and password are required".into()),
        });
        return;
    }
    busy(&store);
    let result = ctx.users.login(req.username.trim(), &req.password).await;
    if settle(&store, result) {
        feed::sync(&ctx, &store).await;
    }
}

/// Handle `auth/register`.
pub async fn register(ctx: Arc<QuillContext>, store: Arc<StateStore>, req: RegisterReq) {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        store.set(AuthState::PATH, AuthState {
            user: None,
            busy: false,
            error: Some("Username, email and password are required".into()),
        });
        return;
    }
    busy(&store);
    let display_name = if req.display_name.trim().is_empty() { req.username.trim() } else { req.display_name.trim() };
    let result = ctx
        .users
        .register(req.username.trim(), display_name, req.email.trim(), &req.password)
        .await;
    if settle(&store, result) {
        feed::sync(&ctx, &store).await;
    }
}

/// Handle `auth/logout`. Per-user screens are dropped; the feed and saved
/// posts stay.
pub async fn logout(ctx: Arc<QuillContext>, store: Arc<StateStore>, _: LogoutReq) {
    if let Err(e) = ctx.users.logout() {
        warn!(error = %e, "sign out failed");
        helpers::notify(&store, e.to_string());
        return;
    }
    store.set(AuthState::PATH, AuthState::default());
    store.remove(PostDetail::PATH);
    store.remove(NotificationsState::PATH);
    store.remove(ComposeState::PATH);
    store.remove(ProfileState::PATH);
}
