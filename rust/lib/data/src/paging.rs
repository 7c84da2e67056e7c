//! Page-numbered listings (followers, following, comments, replies,
//! profile posts).
//!
//! A [`PagingSource`] loads one page and holds no state; a [`Pager`] keeps
//! the pages loaded so far for one listing.

use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::{Comment, Post, Reply, User};
use tracing::debug;

use crate::mapper;
use crate::remote::RemoteDataSource;

/// First page number.
pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub prev_key: Option<u32>,
    /// `None` once the server returned fewer items than requested.
    pub next_key: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(key: u32, page_size: u32, items: Vec<T>) -> Self {
        let short = items.is_empty() || (items.len() as u32) < page_size;
        let next_key = if short { None } else { Some(key + 1) };
        Self {
            items,
            prev_key: if key <= FIRST_PAGE { None } else { Some(key - 1) },
            next_key,
        }
    }
}

#[async_trait::async_trait]
pub trait PagingSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    /// Load page `key` (default first page) of `page_size` items.
    async fn load(&self, key: Option<u32>, page_size: u32) -> NetworkResult<Page<Self::Item>>;
}

macro_rules! remote_source {
    ($(#[$doc:meta])* $name:ident, $item:ty, $fetch:ident, $map:path) => {
        $(#[$doc])*
        pub struct $name {
            remote: Arc<dyn RemoteDataSource>,
            id: String,
        }

        impl $name {
            pub fn new(remote: Arc<dyn RemoteDataSource>, id: impl Into<String>) -> Self {
                Self { remote, id: id.into() }
            }
        }

        #[async_trait::async_trait]
        impl PagingSource for $name {
            type Item = $item;

            async fn load(&self, key: Option<u32>, page_size: u32) -> NetworkResult<Page<$item>> {
                let key = key.unwrap_or(FIRST_PAGE);
                self.remote
                    .$fetch(&self.id, key, page_size)
                    .await
                    .map(|dtos| Page::new(key, page_size, dtos.into_iter().map($map).collect()))
            }
        }
    };
}

remote_source!(
    /// Users following a user.
    FollowersSource, User, fetch_followers, mapper::user_from_dto
);
remote_source!(
    /// Users a user follows.
    FollowingSource, User, fetch_following, mapper::user_from_dto
);
remote_source!(
    /// Comments on a post.
    CommentsSource, Comment, fetch_comments, mapper::comment_from_dto
);
remote_source!(
    /// Replies to a comment.
    RepliesSource, Reply, fetch_replies, mapper::reply_from_dto
);
remote_source!(
    /// Posts written by a user.
    ProfilePostsSource, Post, fetch_user_posts, mapper::post_from_dto
);

/// Where a pager stands after its last load.
#[derive(Debug, Clone, PartialEq)]
pub enum PagerState {
    /// More pages may exist.
    Idle,
    /// Loading `key` failed; `retry` loads it again.
    Error { key: u32, message: String },
    /// The last page has been loaded.
    Complete,
}

/// In-memory page cache for one listing.
pub struct Pager<S: PagingSource> {
    source: S,
    page_size: u32,
    pages: Vec<Page<S::Item>>,
    state: PagerState,
}

impl<S: PagingSource> Pager<S> {
    /// A `page_size` of 0 is treated as 1.
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            pages: Vec::new(),
            state: PagerState::Idle,
        }
    }

    pub fn state(&self) -> &PagerState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == PagerState::Complete
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages.len()
    }

    /// All items loaded so far, in page order.
    pub fn items(&self) -> Vec<S::Item> {
        self.pages.iter().flat_map(|p| p.items.iter().cloned()).collect()
    }

    fn next_key(&self) -> Option<u32> {
        match self.pages.last() {
            None => Some(FIRST_PAGE),
            Some(page) => page.next_key,
        }
    }

    async fn load(&mut self, key: u32) -> &PagerState {
        match self.source.load(Some(key), self.page_size).await {
            NetworkResult::Success(page) => {
                self.state = if page.next_key.is_none() {
                    PagerState::Complete
                } else {
                    PagerState::Idle
                };
                self.pages.push(page);
            }
            other => {
                let message = other.failure_message().unwrap_or_default();
                debug!(key, %message, "page load failed");
                self.state = PagerState::Error { key, message };
            }
        }
        &self.state
    }

    /// Load the next page. Does nothing when complete or after an error
    /// (call `retry` instead).
    pub async fn load_next(&mut self) -> &PagerState {
        if self.state != PagerState::Idle {
            return &self.state;
        }
        match self.next_key() {
            Some(key) => self.load(key).await,
            None => {
                self.state = PagerState::Complete;
                &self.state
            }
        }
    }

    /// Load the page that failed last, once.
    pub async fn retry(&mut self) -> &PagerState {
        match self.state {
            PagerState::Error { key, .. } => self.load(key).await,
            _ => &self.state,
        }
    }

    /// Drop every loaded page and load the first one again.
    pub async fn refresh(&mut self) -> &PagerState {
        self.pages.clear();
        self.state = PagerState::Idle;
        self.load_next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRemote;

    fn followers(remote: &Arc<FakeRemote>) -> FollowersSource {
        FollowersSource::new(remote.clone(), "u1")
    }

    #[test]
    fn page_keys() {
        let full = Page::new(1, 2, vec![1, 2]);
        assert_eq!((full.prev_key, full.next_key), (None, Some(2)));

        let short = Page::new(3, 2, vec![1]);
        assert_eq!((short.prev_key, short.next_key), (Some(2), None));

        let empty: Page<u8> = Page::new(1, 20, vec![]);
        assert_eq!(empty.next_key, None);

        let unsized_empty: Page<u8> = Page::new(1, 0, vec![]);
        assert_eq!(unsized_empty.next_key, None);
    }

    #[tokio::test]
    async fn zero_page_size_still_terminates() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(0);
        let mut pager = Pager::new(followers(&remote), 0);

        for _ in 0..5 {
            pager.load_next().await;
        }
        assert!(pager.is_complete());
        assert_eq!(remote.calls(), vec!["followers:u1:1:1"]);
    }

    #[tokio::test]
    async fn source_defaults_to_first_page() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(5);
        let page = followers(&remote).load(None, 20).await.success().unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.next_key, None);
        assert_eq!(remote.calls(), vec!["followers:u1:1:20"]);
    }

    #[tokio::test]
    async fn full_page_requests_next_and_short_page_terminates() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(25);
        let mut pager = Pager::new(followers(&remote), 20);

        assert_eq!(*pager.load_next().await, PagerState::Idle);
        assert_eq!(pager.items().len(), 20);

        assert_eq!(*pager.load_next().await, PagerState::Complete);
        assert_eq!(pager.items().len(), 25);

        // Terminal: no further requests.
        pager.load_next().await;
        pager.load_next().await;
        assert_eq!(
            remote.calls(),
            vec!["followers:u1:1:20", "followers:u1:2:20"]
        );
    }

    #[tokio::test]
    async fn exact_multiple_ends_with_empty_page() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(40);
        let mut pager = Pager::new(FollowingSource::new(remote.clone(), "u1"), 20);

        while !pager.is_complete() {
            pager.load_next().await;
        }
        assert_eq!(pager.items().len(), 40);
        assert_eq!(pager.pages_loaded(), 3);
        assert_eq!(remote.calls_to("following").len(), 3);
    }

    #[tokio::test]
    async fn failed_page_is_retried_with_same_key() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(30);
        let mut pager = Pager::new(CommentsSource::new(remote.clone(), "p1"), 20);
        pager.load_next().await;

        remote.set_offline(true);
        assert!(matches!(pager.load_next().await, PagerState::Error { key: 2, .. }));
        // load_next does not move past the failure.
        assert!(matches!(pager.load_next().await, PagerState::Error { key: 2, .. }));

        remote.set_offline(false);
        assert_eq!(*pager.retry().await, PagerState::Complete);
        assert_eq!(pager.items().len(), 30);
        assert_eq!(
            remote.calls_to("comments"),
            vec!["comments:p1:1:20", "comments:p1:2:20", "comments:p1:2:20"]
        );
    }

    #[tokio::test]
    async fn refresh_starts_over() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(3);
        let mut pager = Pager::new(ProfilePostsSource::new(remote.clone(), "u9"), 2);
        pager.load_next().await;
        pager.load_next().await;
        assert!(pager.is_complete());

        remote.set_listing_size(1);
        assert_eq!(*pager.refresh().await, PagerState::Complete);
        let items = pager.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].author_id, "u9");
    }

    #[tokio::test]
    async fn replies_source_maps_items() {
        let remote = Arc::new(FakeRemote::new());
        remote.set_listing_size(2);
        let page = RepliesSource::new(remote, "c1").load(Some(1), 20).await.success().unwrap();
        assert_eq!(page.items[0].comment_id, "c1");
    }
}
