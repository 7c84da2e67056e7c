//! Auth state: stored at `auth/state`.

use quill_core::SessionUser;

/// Who is signed in. The UI reads this to decide between the sign-in
/// screen and the app.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub busy: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub const PATH: &'static str = "auth/state";

    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user), busy: false, error: None }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}
