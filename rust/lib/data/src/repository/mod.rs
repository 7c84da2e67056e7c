//! Repositories combine the remote source with local stores.
//!
//! Remote outcomes are returned as `NetworkResult`; local failures as
//! `DataError`. Mutations that touch both return
//! `Result<NetworkResult<T>, DataError>`.

mod comment;
mod draft;
mod notification;
mod post;
mod user;

pub use comment::CommentRepository;
pub use draft::DraftRepository;
pub use notification::NotificationRepository;
pub use post::{compose_feed, FeedPost, PostFeed, PostRepository};
pub use user::UserRepository;
