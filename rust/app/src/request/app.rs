//! App-wide and read-only screen requests.

use super::request_path;

/// Publish the persisted session to `auth/state`.
#[derive(Debug, Clone, Default)]
pub struct InitializeReq;

/// Start following the local feed cache.
#[derive(Debug, Clone, Default)]
pub struct OpenFeedReq;

/// Replace the feed cache with the server's feed.
#[derive(Debug, Clone, Default)]
pub struct SyncFeedReq;

/// Start following the saved posts.
#[derive(Debug, Clone, Default)]
pub struct OpenSavedReq;

/// Notifications for the signed-in user.
#[derive(Debug, Clone, Default)]
pub struct LoadNotificationsReq;

#[derive(Debug, Clone)]
pub struct SearchReq {
    pub query: String,
}

request_path! {
    InitializeReq => "app/initialize",
    OpenFeedReq => "feed/open",
    SyncFeedReq => "feed/sync",
    OpenSavedReq => "saved/open",
    LoadNotificationsReq => "notifications/load",
    SearchReq => "search/query",
}
