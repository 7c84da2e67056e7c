//! Paged listings: followers, following, comments, replies, profile posts.

use quill_core::{Comment, Post, Reply, User};

use super::ui::UiState;

/// One paged listing owned by `owner_id` (a user, post or comment id).
///
/// A failure on the first page shows as `items: Error`. A failure on a
/// later page keeps the loaded items and sets `error`; a retry clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub owner_id: String,
    pub items: UiState<Vec<T>>,
    /// No further pages.
    pub complete: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            owner_id: String::new(),
            items: UiState::Idle,
            complete: false,
            error: None,
        }
    }
}

pub type FollowersList = ListState<User>;
pub type FollowingList = ListState<User>;
pub type CommentsList = ListState<Comment>;
pub type RepliesList = ListState<Reply>;
pub type ProfilePostsList = ListState<Post>;

impl ListState<User> {
    pub const FOLLOWERS_PATH: &'static str = "followers/list";
    pub const FOLLOWING_PATH: &'static str = "following/list";
}

impl ListState<Comment> {
    pub const PATH: &'static str = "comments/list";
}

impl ListState<Reply> {
    pub const PATH: &'static str = "replies/list";
}

impl ListState<Post> {
    pub const PATH: &'static str = "profile/posts";
}
