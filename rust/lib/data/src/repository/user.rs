use std::sync::Arc;

use quill_client::{LoginRequest, NetworkResult, RegisterRequest};
use quill_core::{SessionUser, User};
use tracing::info;

use crate::error::DataError;
use crate::local::LocalDb;
use crate::mapper;
use crate::remote::RemoteDataSource;
use crate::session::Session;

/// Authentication and profiles.
pub struct UserRepository {
    remote: Arc<dyn RemoteDataSource>,
    local: LocalDb,
    session: Arc<Session>,
}

impl UserRepository {
    pub fn new(remote: Arc<dyn RemoteDataSource>, local: LocalDb, session: Arc<Session>) -> Self {
        Self { remote, local, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Sign in. On success the user becomes the session user.
    pub async fn login(&self, username: &str, password: &str) -> Result<NetworkResult<SessionUser>, DataError> {
        let req = LoginRequest { username: username.into(), password: password.into() };
        let result = self.remote.login(&req).await.map(mapper::session_from_auth);
        if let NetworkResult::Success(user) = &result {
            self.session.set(user.clone())?;
        }
        Ok(result)
    }

    pub async fn register(
        &self,
        username: &str,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<NetworkResult<SessionUser>, DataError> {
        let req = RegisterRequest {
            username: username.into(),
            display_name: display_name.into(),
            email: email.into(),
            password: password.into(),
        };
        let result = self.remote.register(&req).await.map(mapper::session_from_auth);
        if let NetworkResult::Success(user) = &result {
            self.session.set(user.clone())?;
        }
        Ok(result)
    }

    /// Forget the session user and their like mirror. Cached and saved
    /// posts are kept.
    pub fn logout(&self) -> Result<(), DataError> {
        self.session.clear()?;
        self.local.likes.clear()?;
        info!("signed out");
        Ok(())
    }

    pub async fn fetch_profile(&self, user_id: &str) -> NetworkResult<User> {
        self.remote.fetch_user(user_id).await.map(mapper::user_from_dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRemote, MemoryKv};
    use quill_client::SessionToken;

    fn repo() -> (Arc<SessionToken>, LocalDb, UserRepository) {
        let token = Arc::new(SessionToken::new());
        let local = LocalDb::open_in_memory().unwrap();
        let session = Arc::new(Session::load(Arc::new(MemoryKv::default()), token.clone()).unwrap());
        let repo = UserRepository::new(Arc::new(FakeRemote::new()), local.clone(), session);
        (token, local, repo)
    }

    #[tokio::test]
    async fn login_sets_session_and_token() {
        let (token, _, repo) = repo();
        let user = repo.login("alice", "secret").await.unwrap().success().unwrap();
        assert_eq!(user.id(), "alice");
        assert_eq!(repo.session().user_id().as_deref(), Some("alice"));
        assert_eq!(token.get().as_deref(), Some("token-alice"));
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_empty() {
        let (token, _, repo) = repo();
        let result = repo.login("alice", "nope").await.unwrap();
        assert_eq!(result.failure_message().as_deref(), Some("invalid credentials"));
        assert!(!repo.session().is_logged_in());
        assert!(token.get().is_none());
    }

    #[tokio::test]
    async fn register_signs_in() {
        let (_, _, repo) = repo();
        let user = repo
            .register("bob", "Bob B", "bob@example.com", "pw")
            .await
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(user.user.display_name, "Bob B");
        assert!(repo.session().is_logged_in());
    }

    #[tokio::test]
    async fn logout_clears_session_and_likes() {
        let (token, local, repo) = repo();
        repo.login("alice", "secret").await.unwrap();
        local.likes.insert("alice", "p1").unwrap();

        repo.logout().unwrap();
        assert!(!repo.session().is_logged_in());
        assert!(token.get().is_none());
        assert!(!local.likes.is_liked("alice", "p1").unwrap());
    }

    #[tokio::test]
    async fn fetch_profile_maps_user() {
        let (_, _, repo) = repo();
        let user = repo.fetch_profile("carol").await.success().unwrap();
        assert_eq!(user.id, "carol");
        // Empty display names fall back to the username.
        assert_eq!(user.display_name, "carol");
    }
}
