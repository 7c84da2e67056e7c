//! Profile header: stored at `profile/state`. The profile's posts are a
//! separate listing at `profile/posts`.

use quill_core::User;

use super::ui::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    pub user_id: String,
    pub user: UiState<User>,
    /// The signed-in user is looking at their own profile.
    pub is_self: bool,
}

impl ProfileState {
    pub const PATH: &'static str = "profile/state";
}
