//! Request definitions.
//!
//! Each struct is a typed request payload bound to one path through
//! [`Request::PATH`]. `register_handlers` installs exactly one handler per
//! request type.

use std::any::Any;

macro_rules! request_path {
    ($($ty:ty => $path:literal),* $(,)?) => {
        $(impl $crate::request::Request for $ty {
            const PATH: &'static str = $path;
        })*
    };
}
pub(crate) use request_path;

pub mod app;
pub mod auth;
pub mod compose;
pub mod listing;
pub mod post;
pub mod user;

pub use app::{InitializeReq, LoadNotificationsReq, OpenFeedReq, OpenSavedReq, SearchReq, SyncFeedReq};
pub use auth::{LoginReq, LogoutReq, RegisterReq};
pub use compose::{DeleteDraftReq, OpenDraftsReq, PublishDraftReq, PublishReq, SaveDraftReq};
pub use listing::{
    AddCommentReq, AddReplyReq, CommentsReq, DeleteCommentReq, FollowersReq, FollowingReq, PageAction,
    ProfilePostsReq, RepliesReq,
};
pub use post::{DeletePostReq, LikePostReq, OpenPostReq, SavePostReq, UnlikePostReq, UnsavePostReq};
pub use user::{FollowUserReq, LoadProfileReq, UnfollowUserReq};

/// A request payload and the path it is emitted on.
pub trait Request: Any + Clone + Send + Sync {
    const PATH: &'static str;
}
