//! User requests.

use super::request_path;

#[derive(Debug, Clone)]
pub struct FollowUserReq {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct UnfollowUserReq {
    pub user_id: String,
}

/// Load a profile header and the first page of its posts.
#[derive(Debug, Clone)]
pub struct LoadProfileReq {
    pub user_id: String,
}

request_path! {
    FollowUserReq => "user/follow",
    UnfollowUserReq => "user/unfollow",
    LoadProfileReq => "profile/load",
}
