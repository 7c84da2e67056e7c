use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use quill_client::{FollowRequest, ImageUpload, LikeRequest, NetworkResult, NewPost, ViewRequest};
use quill_core::{Post, SessionUser};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::local::LocalDb;
use crate::mapper;
use crate::remote::RemoteDataSource;
use crate::session::Session;

/// A post as the feed renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPost {
    pub post: Post,
    pub is_saved: bool,
    /// Always false on the feed path; the detail screen reads the like
    /// mirror instead.
    pub is_liked: bool,
    /// The signed-in user wrote this post.
    pub is_own: bool,
    /// Like/save/comment controls are enabled (someone is signed in).
    pub can_interact: bool,
}

/// Map cached posts to feed records.
pub fn compose_feed(posts: &[Post], saved: &HashSet<String>, user: Option<&SessionUser>) -> Vec<FeedPost> {
    let user_id = user.map(|u| u.id());
    posts
        .iter()
        .map(|p| FeedPost {
            post: p.clone(),
            is_saved: saved.contains(&p.id),
            is_liked: false,
            is_own: user_id == Some(p.author_id.as_str()),
            can_interact: user.is_some(),
        })
        .collect()
}

/// Live feed: re-composed whenever the cache, the saved ids or the
/// session change.
pub struct PostFeed {
    posts: watch::Receiver<Vec<Post>>,
    saved: watch::Receiver<HashSet<String>>,
    session: watch::Receiver<Option<SessionUser>>,
}

impl PostFeed {
    /// The feed as of now. Marks every upstream as seen.
    pub fn current(&mut self) -> Vec<FeedPost> {
        let posts = self.posts.borrow_and_update().clone();
        let saved = self.saved.borrow_and_update().clone();
        let user = self.session.borrow_and_update().clone();
        compose_feed(&posts, &saved, user.as_ref())
    }

    /// Wait until any upstream changes. Returns false once an upstream is
    /// gone and no further values will arrive.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            r = self.posts.changed() => r.is_ok(),
            r = self.saved.changed() => r.is_ok(),
            r = self.session.changed() => r.is_ok(),
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Posts: feed cache, saved posts, likes and post mutations.
pub struct PostRepository {
    remote: Arc<dyn RemoteDataSource>,
    local: LocalDb,
    session: Arc<Session>,
}

impl PostRepository {
    pub fn new(remote: Arc<dyn RemoteDataSource>, local: LocalDb, session: Arc<Session>) -> Self {
        Self { remote, local, session }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Cache first, then saved, then the server.
    ///
    /// A post fetched from the server is written to the cache; failing to
    /// persist it is logged and does not affect the result. A rejected or
    /// failed fetch yields `None` and writes nothing.
    pub async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, DataError> {
        let cached = self.local.cached.get(id)?;
        let saved = self.local.saved.get(id)?;
        if let Some(post) = cached.or(saved) {
            return Ok(Some(post));
        }

        match self.remote.fetch_post(id).await {
            NetworkResult::Success(dto) => {
                let post = mapper::post_from_dto(dto);
                if let Err(e) = self.local.cached.insert(&post) {
                    warn!(post = %id, error = %e, "failed to cache fetched post");
                }
                Ok(Some(post))
            }
            NetworkResult::Error { message, code } => {
                debug!(post = %id, ?code, %message, "post fetch rejected");
                Ok(None)
            }
            NetworkResult::Exception(e) => {
                warn!(post = %id, error = %e, "post fetch failed");
                Ok(None)
            }
        }
    }

    /// The live feed over the whole cache.
    pub fn get_all_posts(&self) -> Result<PostFeed, DataError> {
        Ok(PostFeed {
            posts: self.local.cached.watch_all()?,
            saved: self.local.saved.watch_ids()?,
            session: self.session.watch(),
        })
    }

    /// Replace the cache with the server's feed.
    ///
    /// Delete-all then insert-all, not isolated from readers: a reader
    /// between them sees an empty cache, and so does everyone if the insert
    /// fails, until the next successful sync. Network failures leave the
    /// cache untouched and are only logged.
    pub async fn sync_feed(&self) -> Result<(), DataError> {
        match self.remote.fetch_feed().await {
            NetworkResult::Success(dtos) => {
                let posts = mapper::posts_from_dtos(dtos);
                self.local.cached.delete_all()?;
                self.local.cached.insert_all(&posts)?;
                info!(count = posts.len(), "feed synced");
            }
            NetworkResult::Error { message, code } => {
                warn!(?code, %message, "feed sync rejected");
            }
            NetworkResult::Exception(e) => {
                warn!(error = %e, "feed sync failed");
            }
        }
        Ok(())
    }

    pub async fn search(&self, query: &str) -> NetworkResult<Vec<Post>> {
        self.remote.search_posts(query).await.map(mapper::posts_from_dtos)
    }

    // ── Saved posts ─────────────────────────────────────────────────

    pub fn get_saved_post_ids(&self) -> Result<watch::Receiver<HashSet<String>>, DataError> {
        self.local.saved.watch_ids()
    }

    pub fn get_saved_posts(&self) -> Result<watch::Receiver<Vec<Post>>, DataError> {
        self.local.saved.watch_all()
    }

    pub fn insert_saved_post(&self, post: &Post) -> Result<(), DataError> {
        self.local.saved.insert(post)
    }

    pub fn delete_saved_post_by_id(&self, id: &str) -> Result<(), DataError> {
        self.local.saved.delete(id)
    }

    // ── Likes ───────────────────────────────────────────────────────

    pub fn is_post_liked(&self, user_id: &str, post_id: &str) -> Result<bool, DataError> {
        self.local.likes.is_liked(user_id, post_id)
    }

    pub async fn like_post(&self, user_id: &str, post_id: &str) -> Result<NetworkResult<()>, DataError> {
        let req = LikeRequest { user_id: user_id.into(), post_id: post_id.into() };
        let result = self.remote.like(&req).await;
        if result.is_success() {
            self.local.likes.insert(user_id, post_id)?;
        }
        Ok(result)
    }

    pub async fn unlike_post(&self, user_id: &str, post_id: &str) -> Result<NetworkResult<()>, DataError> {
        let req = LikeRequest { user_id: user_id.into(), post_id: post_id.into() };
        let result = self.remote.unlike(&req).await;
        if result.is_success() {
            self.local.likes.delete(user_id, post_id)?;
        }
        Ok(result)
    }

    // ── Follows ─────────────────────────────────────────────────────

    /// Follow state is server-only; nothing is written locally.
    pub async fn follow_user(&self, follower_id: &str, following_id: &str) -> NetworkResult<()> {
        let req = FollowRequest { follower_id: follower_id.into(), following_id: following_id.into() };
        self.remote.follow(&req).await
    }

    pub async fn unfollow_user(&self, follower_id: &str, following_id: &str) -> NetworkResult<()> {
        let req = FollowRequest { follower_id: follower_id.into(), following_id: following_id.into() };
        self.remote.unfollow(&req).await
    }

    // ── Post lifecycle ──────────────────────────────────────────────

    /// Delete on the server, then drop the cached row. Saved copies stay.
    pub async fn delete_post(&self, post_id: &str) -> Result<NetworkResult<()>, DataError> {
        let result = self.remote.delete_post(post_id).await;
        if result.is_success() {
            self.local.cached.delete(post_id)?;
        }
        Ok(result)
    }

    /// Record a view. Failures are logged and otherwise ignored.
    pub async fn add_view(&self, user_id: &str, post_id: &str) {
        let req = ViewRequest { user_id: user_id.into(), post_id: post_id.into() };
        if let Some(message) = self.remote.add_view(&req).await.failure_message() {
            debug!(post = %post_id, %message, "view not recorded");
        }
    }

    /// Upload a new post, reading the optional image from disk.
    pub async fn upload_post(
        &self,
        title: &str,
        body: &str,
        author_id: &str,
        image_path: Option<&Path>,
    ) -> Result<NetworkResult<Post>, DataError> {
        let image = match image_path {
            Some(path) => Some(ImageUpload {
                bytes: tokio::fs::read(path).await?,
                file_name: path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("image")
                    .to_string(),
                content_type: content_type_for(path).to_string(),
            }),
            None => None,
        };

        let new_post = NewPost {
            title: title.into(),
            body: body.into(),
            author_id: author_id.into(),
            image,
        };
        Ok(self.remote.upload_post(new_post).await.map(mapper::post_from_dto))
    }
}
