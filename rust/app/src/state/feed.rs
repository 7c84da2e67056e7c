//! Feed and saved-posts screens: `feed/state`, `saved/state`.

use quill_core::Post;
use quill_data::FeedPost;

use super::ui::UiState;

/// Home feed. `posts` follows the local cache live once the feed is open.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub posts: UiState<Vec<FeedPost>>,
    /// A server sync is in flight.
    pub syncing: bool,
}

impl FeedState {
    pub const PATH: &'static str = "feed/state";
}

/// Bookmarked posts, newest save first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavedState {
    pub posts: UiState<Vec<Post>>,
}

impl SavedState {
    pub const PATH: &'static str = "saved/state";
}
