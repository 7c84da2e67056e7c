use std::sync::Arc;

use quill_client::SessionToken;
use quill_core::SessionUser;
use quill_kv::{KVStore, KVStoreExt};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::DataError;

const SESSION_KEY: &str = "session:user";

/// The signed-in user, persisted in the KV store.
///
/// At most one user is stored. Every change is mirrored into the HTTP
/// client's bearer token and published to watchers.
pub struct Session {
    kv: Arc<dyn KVStore>,
    token: Arc<SessionToken>,
    current: watch::Sender<Option<SessionUser>>,
}

impl Session {
    /// Load the persisted user, if any.
    pub fn load(kv: Arc<dyn KVStore>, token: Arc<SessionToken>) -> Result<Self, DataError> {
        let user: Option<SessionUser> = kv.get_json(SESSION_KEY)?;
        token.set(user.as_ref().map(|u| u.token.clone()));
        if let Some(u) = &user {
            debug!(user = %u.user.username, "restored session");
        }
        let (current, _) = watch::channel(user);
        Ok(Self { kv, token, current })
    }

    pub fn set(&self, user: SessionUser) -> Result<(), DataError> {
        self.kv.set_json(SESSION_KEY, &user)?;
        self.token.set(Some(user.token.clone()));
        info!(user = %user.user.username, "signed in");
        self.current.send_replace(Some(user));
        Ok(())
    }

    pub fn clear(&self) -> Result<(), DataError> {
        self.kv.delete(SESSION_KEY)?;
        self.token.set(None);
        self.current.send_replace(None);
        Ok(())
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.current.borrow().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|u| u.user.id.clone())
    }

    /// Id of the signed-in user, or `NotLoggedIn`.
    pub fn require_user_id(&self) -> Result<String, DataError> {
        self.user_id().ok_or(DataError::NotLoggedIn)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn watch(&self) -> watch::Receiver<Option<SessionUser>> {
        self.current.subscribe()
    }
}
