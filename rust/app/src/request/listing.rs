//! Paged listings and comment mutations.

use super::request_path;

/// What to do with a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageAction {
    /// Drop loaded pages and load the first one.
    #[default]
    Refresh,
    /// Load the page after the last one loaded.
    Next,
    /// Load the page that failed, again.
    Retry,
}

#[derive(Debug, Clone)]
pub struct FollowersReq {
    pub user_id: String,
    pub action: PageAction,
}

#[derive(Debug, Clone)]
pub struct FollowingReq {
    pub user_id: String,
    pub action: PageAction,
}

#[derive(Debug, Clone)]
pub struct ProfilePostsReq {
    pub user_id: String,
    pub action: PageAction,
}

#[derive(Debug, Clone)]
pub struct CommentsReq {
    pub post_id: String,
    pub action: PageAction,
}

#[derive(Debug, Clone)]
pub struct RepliesReq {
    pub comment_id: String,
    pub action: PageAction,
}

#[derive(Debug, Clone)]
pub struct AddCommentReq {
    pub post_id: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct DeleteCommentReq {
    pub comment_id: String,
}

#[derive(Debug, Clone)]
pub struct AddReplyReq {
    pub comment_id: String,
    pub body: String,
}

request_path! {
    FollowersReq => "followers/page",
    FollowingReq => "following/page",
    ProfilePostsReq => "profile/page",
    CommentsReq => "comments/page",
    RepliesReq => "replies/page",
    AddCommentReq => "comment/add",
    DeleteCommentReq => "comment/delete",
    AddReplyReq => "reply/add",
}
