//! Shared helpers for handlers.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::SessionUser;
use quill_flux::StateStore;
use tokio::sync::watch;

use super::QuillContext;
use crate::state::AppMessage;

pub const SIGN_IN_REQUIRED: &str = "Sign in to continue";

/// Show a one-shot message.
pub fn notify(store: &StateStore, message: impl Into<String>) {
    store.set(AppMessage::PATH, AppMessage(message.into()));
}

/// The signed-in user, or `None` after telling the user to sign in.
pub fn require_user(ctx: &QuillContext, store: &StateStore) -> Option<SessionUser> {
    let user = ctx.session.current();
    if user.is_none() {
        notify(store, SIGN_IN_REQUIRED);
    }
    user
}

/// Text for a failed network result.
pub fn failure_text<T>(result: &NetworkResult<T>) -> String {
    result
        .failure_message()
        .unwrap_or_else(|| "Something went wrong".to_string())
}

/// Keep applying values from `rx` to the store until the app closes.
/// Only the first caller per `path` starts a subscription.
pub fn follow<T, F>(ctx: &QuillContext, path: &'static str, store: Arc<StateStore>, mut rx: watch::Receiver<T>, apply: F)
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&StateStore, T) + Send + 'static,
{
    if !ctx.start_live(path) {
        return;
    }
    ctx.scope.spawn(async move {
        while rx.changed().await.is_ok() {
            let value = rx.borrow_and_update().clone();
            apply(&store, value);
        }
    });
}
