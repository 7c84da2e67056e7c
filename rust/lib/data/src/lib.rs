//! Quill data layer: local stores, session, remote source, repositories
//! and paging.
//!
//! Local state lives in SQLite (posts cache, saved posts, likes, drafts)
//! and redb (session). Reads that back a screen are live: they return a
//! `tokio::sync::watch::Receiver` that refreshes after every write to the
//! underlying table.

pub mod error;
pub mod local;
pub mod mapper;
pub mod paging;
pub mod remote;
pub mod repository;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::DataError;
pub use local::LocalDb;
pub use paging::{
    CommentsSource, FollowersSource, FollowingSource, Page, Pager, PagerState, PagingSource,
    ProfilePostsSource, RepliesSource,
};
pub use remote::RemoteDataSource;
pub use repository::{
    CommentRepository, DraftRepository, FeedPost, NotificationRepository, PostFeed,
    PostRepository, UserRepository,
};
pub use session::Session;
