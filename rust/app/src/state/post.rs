//! Post detail: stored at `post/detail`.

use quill_data::FeedPost;

use super::ui::UiState;

/// The open post. Unlike the feed, `is_liked` reflects the local like
/// mirror here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostDetail {
    pub post_id: String,
    /// `Empty` when the post is known nowhere.
    pub post: UiState<FeedPost>,
}

impl PostDetail {
    pub const PATH: &'static str = "post/detail";

    /// Apply `f` to the loaded post if it is `post_id`.
    pub fn patch(&mut self, post_id: &str, f: impl FnOnce(&mut FeedPost)) {
        if self.post_id != post_id {
            return;
        }
        if let Some(post) = self.post.data_mut() {
            f(post);
        }
    }
}
