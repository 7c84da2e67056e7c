//! Screen state definitions.
//!
//! Each type is stored at the path in its `PATH` const. Handlers replace
//! the whole value on every transition; readers never see a half-written
//! state.

pub mod app;
pub mod auth;
pub mod compose;
pub mod feed;
pub mod inbox;
pub mod listing;
pub mod post;
pub mod profile;
pub mod ui;

pub use app::AppMessage;
pub use auth::AuthState;
pub use compose::{ComposeState, DraftsState};
pub use feed::{FeedState, SavedState};
pub use inbox::{NotificationsState, SearchState};
pub use listing::{CommentsList, FollowersList, FollowingList, ListState, ProfilePostsList, RepliesList};
pub use post::PostDetail;
pub use profile::ProfileState;
pub use ui::UiState;
