//! Fakes and fixtures for tests in this crate and downstream crates.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use quill_client::*;
use quill_core::{Post, SessionUser, User};
use quill_kv::{KVError, KVStore};
use quill_sql::{written_table, ChangeHandler, ListenerId, Row, SQLError, SQLStore, SqliteStore, Value};

use crate::remote::RemoteDataSource;

pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.into(),
        title: title.into(),
        body: format!("body of {}", id),
        author_id: "author".into(),
        author_username: "author".into(),
        author_display_name: "Author".into(),
        author_avatar: None,
        image_url: None,
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: "2024-01-01T00:00:00Z".into(),
        like_count: 0,
        view_count: 0,
        comment_count: 0,
    }
}

pub fn post_dto(id: &str, title: &str) -> PostDto {
    post_dto_by(id, title, "author")
}

pub fn post_dto_by(id: &str, title: &str, author_id: &str) -> PostDto {
    PostDto {
        id: id.into(),
        title: title.into(),
        body: format!("body of {}", id),
        author: AuthorDto {
            id: author_id.into(),
            username: author_id.into(),
            display_name: String::new(),
            avatar_url: None,
        },
        image_url: None,
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: None,
        likes_count: 0,
        views_count: 0,
        comments_count: 0,
    }
}

pub fn user_dto(id: &str) -> UserDto {
    UserDto {
        id: id.into(),
        username: id.into(),
        display_name: String::new(),
        avatar_url: None,
        bio: None,
        posts_count: 0,
        followers_count: 0,
        following_count: 0,
    }
}

pub fn session_user(id: &str) -> SessionUser {
    SessionUser {
        user: User {
            id: id.into(),
            username: id.into(),
            display_name: id.into(),
            avatar_url: None,
            bio: None,
            post_count: 0,
            follower_count: 0,
            following_count: 0,
        },
        token: format!("token-{}", id),
    }
}

/// KV store kept in memory.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl KVStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// In-memory SQLite that can be told to fail every INSERT into one table.
/// Other statements, including deletes on that table, go through.
pub struct FlakySql {
    inner: SqliteStore,
    failing: Mutex<Option<String>>,
}

impl FlakySql {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            failing: Mutex::new(None),
        }
    }

    pub fn fail_inserts_into(&self, table: Option<&str>) {
        *self.failing.lock().unwrap() = table.map(str::to_string);
    }
}

impl Default for FlakySql {
    fn default() -> Self {
        Self::new()
    }
}

impl SQLStore for FlakySql {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        self.inner.query(sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let failing = self.failing.lock().unwrap().clone();
        let is_insert = sql.trim_start().to_ascii_uppercase().starts_with("INSERT");
        if is_insert && failing.is_some() && written_table(sql) == failing {
            return Err(SQLError::Execution("disk I/O error".into()));
        }
        self.inner.exec(sql, params)
    }

    fn exec_batch(&self, sql: &str) -> Result<(), SQLError> {
        self.inner.exec_batch(sql)
    }

    fn on_change(&self, handler: ChangeHandler) -> ListenerId {
        self.inner.on_change(handler)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.remove_listener(id)
    }
}

/// Scriptable in-memory server.
///
/// - `offline` turns every call into an `Exception`.
/// - `reject` turns every call into an `Error` with status 500.
/// - `posts` backs `fetch_post`; ids not present answer 404.
/// - Paged listings serve `listing_size` generated items.
/// - Every call is recorded in `calls`.
pub struct FakeRemote {
    pub feed: Mutex<Vec<PostDto>>,
    pub posts: Mutex<HashMap<String, PostDto>>,
    pub offline: AtomicBool,
    pub reject: AtomicBool,
    pub listing_size: AtomicU32,
    pub calls: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<NewPost>>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self {
            feed: Mutex::new(Vec::new()),
            posts: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            reject: AtomicBool::new(false),
            listing_size: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_feed(&self, posts: Vec<PostDto>) {
        *self.feed.lock().unwrap() = posts;
    }

    pub fn add_post(&self, post: PostDto) {
        self.posts.lock().unwrap().insert(post.id.clone(), post);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    pub fn set_listing_size(&self, n: u32) {
        self.listing_size.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }

    fn answer<T>(&self, call: String, f: impl FnOnce() -> NetworkResult<T>) -> NetworkResult<T> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return NetworkResult::Exception(ApiError::InvalidRequest("offline".into()));
        }
        if self.reject.load(Ordering::SeqCst) {
            return NetworkResult::Error { message: "server error".into(), code: Some(500) };
        }
        f()
    }

    fn page<T>(&self, page: u32, limit: u32, make: impl Fn(u32) -> T) -> Vec<T> {
        let total = self.listing_size.load(Ordering::SeqCst);
        let start = (page.saturating_sub(1)) * limit;
        let end = (start + limit).min(total);
        (start..end).map(make).collect()
    }
}

fn author(id: &str) -> AuthorDto {
    AuthorDto {
        id: id.into(),
        username: id.into(),
        display_name: String::new(),
        avatar_url: None,
    }
}

#[async_trait::async_trait]
impl RemoteDataSource for FakeRemote {
    async fn login(&self, req: &LoginRequest) -> NetworkResult<AuthResponse> {
        self.answer(format!("login:{}", req.username), || {
            if req.password == "secret" {
                NetworkResult::Success(AuthResponse {
                    token: format!("token-{}", req.username),
                    user: user_dto(&req.username),
                })
            } else {
                NetworkResult::Error { message: "invalid credentials".into(), code: Some(401) }
            }
        })
    }

    async fn register(&self, req: &RegisterRequest) -> NetworkResult<AuthResponse> {
        self.answer(format!("register:{}", req.username), || {
            NetworkResult::Success(AuthResponse {
                token: format!("token-{}", req.username),
                user: UserDto {
                    display_name: req.display_name.clone(),
                    ..user_dto(&req.username)
                },
            })
        })
    }

    async fn fetch_feed(&self) -> NetworkResult<Vec<PostDto>> {
        self.answer("fetch_feed".into(), || NetworkResult::Success(self.feed.lock().unwrap().clone()))
    }

    async fn fetch_post(&self, id: &str) -> NetworkResult<PostDto> {
        self.answer(format!("fetch_post:{}", id), || match self.posts.lock().unwrap().get(id) {
            Some(p) => NetworkResult::Success(p.clone()),
            None => NetworkResult::Error { message: "not found".into(), code: Some(404) },
        })
    }

    async fn delete_post(&self, id: &str) -> NetworkResult<()> {
        self.answer(format!("delete_post:{}", id), || NetworkResult::Success(()))
    }

    async fn add_view(&self, req: &ViewRequest) -> NetworkResult<()> {
        self.answer(format!("add_view:{}:{}", req.user_id, req.post_id), || NetworkResult::Success(()))
    }

    async fn search_posts(&self, query: &str) -> NetworkResult<Vec<PostDto>> {
        self.answer(format!("search:{}", query), || {
            let hits = self
                .feed
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.title.to_lowercase().contains(&query.to_lowercase()))
                .cloned()
                .collect();
            NetworkResult::Success(hits)
        })
    }

    async fn upload_post(&self, post: NewPost) -> NetworkResult<PostDto> {
        let call = format!("upload_post:{}", post.title);
        self.answer(call, || {
            let dto = post_dto_by("uploaded", &post.title, &post.author_id);
            self.uploads.lock().unwrap().push(post);
            NetworkResult::Success(dto)
        })
    }

    async fn like(&self, req: &LikeRequest) -> NetworkResult<()> {
        self.answer(format!("like:{}:{}", req.user_id, req.post_id), || NetworkResult::Success(()))
    }

    async fn unlike(&self, req: &LikeRequest) -> NetworkResult<()> {
        self.answer(format!("unlike:{}:{}", req.user_id, req.post_id), || NetworkResult::Success(()))
    }

    async fn follow(&self, req: &FollowRequest) -> NetworkResult<()> {
        self.answer(format!("follow:{}:{}", req.follower_id, req.following_id), || {
            NetworkResult::Success(())
        })
    }

    async fn unfollow(&self, req: &FollowRequest) -> NetworkResult<()> {
        self.answer(format!("unfollow:{}:{}", req.follower_id, req.following_id), || {
            NetworkResult::Success(())
        })
    }

    async fn fetch_user(&self, id: &str) -> NetworkResult<UserDto> {
        self.answer(format!("fetch_user:{}", id), || NetworkResult::Success(user_dto(id)))
    }

    async fn fetch_followers(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>> {
        self.answer(format!("followers:{}:{}:{}", id, page, limit), || {
            NetworkResult::Success(self.page(page, limit, |i| user_dto(&format!("follower{}", i))))
        })
    }

    async fn fetch_following(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>> {
        self.answer(format!("following:{}:{}:{}", id, page, limit), || {
            NetworkResult::Success(self.page(page, limit, |i| user_dto(&format!("followee{}", i))))
        })
    }

    async fn fetch_user_posts(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<PostDto>> {
        self.answer(format!("user_posts:{}:{}:{}", id, page, limit), || {
            NetworkResult::Success(self.page(page, limit, |i| post_dto_by(&format!("p{}", i), "t", id)))
        })
    }

    async fn fetch_notifications(&self, user_id: &str) -> NetworkResult<Vec<NotificationDto>> {
        self.answer(format!("notifications:{}", user_id), || {
            NetworkResult::Success(vec![NotificationDto {
                id: "n1".into(),
                kind: "FOLLOW".into(),
                message: "someone followed you".into(),
                actor: author("someone"),
                post_id: None,
                read: false,
                created_at: "2024-01-01T00:00:00Z".into(),
            }])
        })
    }

    async fn fetch_comments(&self, post_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<CommentDto>> {
        self.answer(format!("comments:{}:{}:{}", post_id, page, limit), || {
            NetworkResult::Success(self.page(page, limit, |i| CommentDto {
                id: format!("c{}", i),
                post_id: post_id.into(),
                author: author("someone"),
                body: format!("comment {}", i),
                replies_count: 0,
                created_at: "2024-01-01T00:00:00Z".into(),
            }))
        })
    }

    async fn add_comment(&self, post_id: &str, req: &CommentRequest) -> NetworkResult<CommentDto> {
        self.answer(format!("add_comment:{}:{}", post_id, req.user_id), || {
            NetworkResult::Success(CommentDto {
                id: "new-comment".into(),
                post_id: post_id.into(),
                author: author(&req.user_id),
                body: req.body.clone(),
                replies_count: 0,
                created_at: "2024-01-01T00:00:00Z".into(),
            })
        })
    }

    async fn delete_comment(&self, id: &str) -> NetworkResult<()> {
        self.answer(format!("delete_comment:{}", id), || NetworkResult::Success(()))
    }

    async fn fetch_replies(&self, comment_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<ReplyDto>> {
        self.answer(format!("replies:{}:{}:{}", comment_id, page, limit), || {
            NetworkResult::Success(self.page(page, limit, |i| ReplyDto {
                id: format!("r{}", i),
                comment_id: comment_id.into(),
                author: author("someone"),
                body: format!("reply {}", i),
                created_at: "2024-01-01T00:00:00Z".into(),
            }))
        })
    }

    async fn add_reply(&self, comment_id: &str, req: &CommentRequest) -> NetworkResult<ReplyDto> {
        self.answer(format!("add_reply:{}:{}", comment_id, req.user_id), || {
            NetworkResult::Success(ReplyDto {
                id: "new-reply".into(),
                comment_id: comment_id.into(),
                author: author(&req.user_id),
                body: req.body.clone(),
                created_at: "2024-01-01T00:00:00Z".into(),
            })
        })
    }
}
