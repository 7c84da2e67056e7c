//! Post requests.

use super::request_path;

/// Load post detail and record a view.
#[derive(Debug, Clone)]
pub struct OpenPostReq {
    pub post_id: String,
}

#[derive(Debug, Clone)]
pub struct LikePostReq {
    pub post_id: String,
}

#[derive(Debug, Clone)]
pub struct UnlikePostReq {
    pub post_id: String,
}

/// Bookmark a post locally.
#[derive(Debug, Clone)]
pub struct SavePostReq {
    pub post_id: String,
}

#[derive(Debug, Clone)]
pub struct UnsavePostReq {
    pub post_id: String,
}

#[derive(Debug, Clone)]
pub struct DeletePostReq {
    pub post_id: String,
}

request_path! {
    OpenPostReq => "post/open",
    LikePostReq => "post/like",
    UnlikePostReq => "post/unlike",
    SavePostReq => "post/save",
    UnsavePostReq => "post/unsave",
    DeletePostReq => "post/delete",
}
