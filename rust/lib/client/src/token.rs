use std::sync::RwLock;

use crate::error::ApiError;

/// Pluggable token provider. Called before every API request.
///
/// Returns `Ok(None)` to skip the Authorization header (anonymous).
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// No authentication: anonymous requests.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Static bearer token (already obtained externally).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

/// Token that follows the signed-in session: set on login, cleared on logout.
#[derive(Default)]
pub struct SessionToken {
    current: RwLock<Option<String>>,
}

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: Option<String>) {
        if let Ok(mut guard) = self.current.write() {
            *guard = token;
        }
    }

    pub fn get(&self) -> Option<String> {
        self.current.read().ok().and_then(|g| g.clone())
    }
}

#[async_trait::async_trait]
impl TokenSource for SessionToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_auth_returns_none() {
        assert!(NoAuth.token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn static_token_returns_value() {
        let ts = StaticToken::new("tok");
        assert_eq!(ts.token().await.unwrap(), Some("tok".to_string()));
    }

    #[tokio::test]
    async fn session_token_follows_set_and_clear() {
        let ts = SessionToken::new();
        assert_eq!(ts.token().await.unwrap(), None);
        ts.set(Some("abc".into()));
        assert_eq!(ts.token().await.unwrap(), Some("abc".to_string()));
        ts.set(None);
        assert_eq!(ts.token().await.unwrap(), None);
    }
}
