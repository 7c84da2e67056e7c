use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dto::*;
use crate::error::ApiError;
use crate::result::NetworkResult;
use crate::token::TokenSource;

/// Typed client for the Quill REST API.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token_source: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        token_source: Arc<dyn TokenSource>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let base = Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("server url {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!("server url {} cannot carry a path", base_url)));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base, token_source })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Endpoint under the base URL. Each segment is percent-encoded, so an
    /// id containing `/` or `?` stays one segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build a request with auth header.
    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Send a request, classifying non-2xx statuses as `Error`.
    async fn send(&self, builder: RequestBuilder) -> NetworkResult<reqwest::Response> {
        let builder = match self.authed(builder).await {
            Ok(b) => b,
            Err(e) => return NetworkResult::Exception(e),
        };
        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => return NetworkResult::Exception(e.into()),
        };

        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            debug!(code, %message, "request rejected");
            return NetworkResult::Error { message, code: Some(code) };
        }
        NetworkResult::Success(resp)
    }

    /// Send and decode a JSON body.
    async fn json<R: DeserializeOwned>(&self, builder: RequestBuilder) -> NetworkResult<R> {
        match self.send(builder).await {
            NetworkResult::Success(resp) => match resp.json::<R>().await {
                Ok(v) => NetworkResult::Success(v),
                Err(e) => NetworkResult::Exception(ApiError::Decode(format!("response body: {}", e))),
            },
            NetworkResult::Error { message, code } => NetworkResult::Error { message, code },
            NetworkResult::Exception(e) => NetworkResult::Exception(e),
        }
    }

    /// Send and ignore any response body.
    async fn unit(&self, builder: RequestBuilder) -> NetworkResult<()> {
        self.send(builder).await.map(|_| ())
    }

    fn paged(&self, segments: &[&str], page: u32, limit: u32) -> RequestBuilder {
        self.http
            .get(self.url(segments))
            .query(&[("page", page), ("limit", limit)])
    }

    // ── Auth ────────────────────────────────────────────────────────

    pub async fn login(&self, req: &LoginRequest) -> NetworkResult<AuthResponse> {
        self.json(self.http.post(self.url(&["auth", "login"])).json(req)).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> NetworkResult<AuthResponse> {
        self.json(self.http.post(self.url(&["auth", "register"])).json(req)).await
    }

    // ── Posts ───────────────────────────────────────────────────────

    pub async fn fetch_feed(&self) -> NetworkResult<Vec<PostDto>> {
        self.json(self.http.get(self.url(&["posts"]))).await
    }

    pub async fn fetch_post(&self, id: &str) -> NetworkResult<PostDto> {
        self.json(self.http.get(self.url(&["posts", id]))).await
    }

    pub async fn delete_post(&self, id: &str) -> NetworkResult<()> {
        self.unit(self.http.delete(self.url(&["posts", id]))).await
    }

    pub async fn add_view(&self, req: &ViewRequest) -> NetworkResult<()> {
        let url = self.url(&["posts", req.post_id.as_str(), "views"]);
        self.unit(self.http.post(url).json(req)).await
    }

    pub async fn search_posts(&self, query: &str) -> NetworkResult<Vec<PostDto>> {
        let req = self.http.get(self.url(&["posts", "search"])).query(&[("q", query)]);
        self.json(req).await
    }

    /// Upload a new post as multipart form data.
    pub async fn upload_post(&self, post: NewPost) -> NetworkResult<PostDto> {
        let mut form = Form::new()
            .text("title", post.title)
            .text("body", post.body)
            .text("author_id", post.author_id);

        if let Some(image) = post.image {
            let part = match Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
            {
                Ok(p) => p,
                Err(e) => {
                    return NetworkResult::Exception(ApiError::InvalidRequest(format!(
                        "image content type: {}",
                        e
                    )))
                }
            };
            form = form.part("image", part);
        }

        self.json(self.http.post(self.url(&["posts"])).multipart(form)).await
    }

    // ── Likes / follows ─────────────────────────────────────────────

    pub async fn like(&self, req: &LikeRequest) -> NetworkResult<()> {
        self.unit(self.http.post(self.url(&["likes"])).json(req)).await
    }

    pub async fn unlike(&self, req: &LikeRequest) -> NetworkResult<()> {
        let url = self.url(&["likes", req.user_id.as_str(), req.post_id.as_str()]);
        self.unit(self.http.delete(url)).await
    }

    pub async fn follow(&self, req: &FollowRequest) -> NetworkResult<()> {
        self.unit(self.http.post(self.url(&["follows"])).json(req)).await
    }

    pub async fn unfollow(&self, req: &FollowRequest) -> NetworkResult<()> {
        let url = self.url(&["follows", req.follower_id.as_str(), req.following_id.as_str()]);
        self.unit(self.http.delete(url)).await
    }

    // ── Users ───────────────────────────────────────────────────────

    pub async fn fetch_user(&self, id: &str) -> NetworkResult<UserDto> {
        self.json(self.http.get(self.url(&["users", id]))).await
    }

    pub async fn fetch_followers(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>> {
        self.json(self.paged(&["users", id, "followers"], page, limit)).await
    }

    pub async fn fetch_following(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>> {
        self.json(self.paged(&["users", id, "following"], page, limit)).await
    }

    pub async fn fetch_user_posts(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<PostDto>> {
        self.json(self.paged(&["users", id, "posts"], page, limit)).await
    }

    pub async fn fetch_notifications(&self, user_id: &str) -> NetworkResult<Vec<NotificationDto>> {
        self.json(self.http.get(self.url(&["users", user_id, "notifications"]))).await
    }

    // ── Comments / replies ──────────────────────────────────────────

    pub async fn fetch_comments(&self, post_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<CommentDto>> {
        self.json(self.paged(&["posts", post_id, "comments"], page, limit)).await
    }

    pub async fn add_comment(&self, post_id: &str, req: &CommentRequest) -> NetworkResult<CommentDto> {
        let url = self.url(&["posts", post_id, "comments"]);
        self.json(self.http.post(url).json(req)).await
    }

    pub async fn delete_comment(&self, id: &str) -> NetworkResult<()> {
        self.unit(self.http.delete(self.url(&["comments", id]))).await
    }

    pub async fn fetch_replies(&self, comment_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<ReplyDto>> {
        self.json(self.paged(&["comments", comment_id, "replies"], page, limit)).await
    }

    pub async fn add_reply(&self, comment_id: &str, req: &CommentRequest) -> NetworkResult<ReplyDto> {
        let url = self.url(&["comments", comment_id, "replies"]);
        self.json(self.http.post(url).json(req)).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use axum::extract::{Multipart, Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::token::{NoAuth, SessionToken, StaticToken};

    // =====================================================================
    // Test server
    // =====================================================================

    #[derive(Default)]
    struct Recorded {
        likes: Vec<LikeRequest>,
        unlikes: Vec<(String, String)>,
        uploads: Vec<HashMap<String, String>>,
    }

    type Shared = Arc<Mutex<Recorded>>;

    fn author() -> AuthorDto {
        AuthorDto {
            id: "u1".into(),
            username: "alice".into(),
            display_name: "Alice".into(),
            avatar_url: None,
        }
    }

    fn post_dto(id: &str, title: &str) -> PostDto {
        PostDto {
            id: id.into(),
            title: title.into(),
            body: "body".into(),
            author: author(),
            image_url: None,
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: None,
            likes_count: 1,
            views_count: 2,
            comments_count: 0,
        }
    }

    fn user_dto(id: &str) -> UserDto {
        UserDto {
            id: id.into(),
            username: format!("user{}", id),
            display_name: String::new(),
            avatar_url: None,
            bio: None,
            posts_count: 0,
            followers_count: 0,
            following_count: 0,
        }
    }

    async fn login_handler(Json(body): Json<LoginRequest>) -> Response {
        if body.password == "secret" {
            Json(json!({ "token": "tok-1", "user": user_dto("u1") })).into_response()
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid credentials" }))).into_response()
        }
    }

    async fn feed_handler() -> Json<Vec<PostDto>> {
        Json(vec![post_dto("p1", "First"), post_dto("p2", "Second")])
    }

    async fn post_handler(Path(id): Path<String>) -> Response {
        if id == "p1" {
            Json(post_dto("p1", "First")).into_response()
        } else {
            (StatusCode::NOT_FOUND, Json(json!({ "message": "post not found" }))).into_response()
        }
    }

    async fn search_handler(Query(q): Query<HashMap<String, String>>) -> Json<Vec<PostDto>> {
        let needle = q.get("q").cloned().unwrap_or_default();
        let all = vec![post_dto("p1", "Rust tips"), post_dto("p2", "Gardening")];
        Json(all.into_iter().filter(|p| p.title.contains(&needle)).collect())
    }

    async fn like_handler(State(rec): State<Shared>, Json(body): Json<LikeRequest>) -> StatusCode {
        rec.lock().unwrap().likes.push(body);
        StatusCode::CREATED
    }

    async fn unlike_handler(State(rec): State<Shared>, Path((user, post)): Path<(String, String)>) -> StatusCode {
        rec.lock().unwrap().unlikes.push((user, post));
        StatusCode::NO_CONTENT
    }

    async fn user_handler(Path(id): Path<String>) -> Response {
        if id == "garbage" {
            "this is not json".into_response()
        } else {
            Json(user_dto(&id)).into_response()
        }
    }

    /// Serves 5 followers in total, paged by `page` and `limit`.
    async fn followers_handler(Query(q): Query<HashMap<String, u32>>) -> Json<Vec<UserDto>> {
        let page = q.get("page").copied().unwrap_or(1);
        let limit = q.get("limit").copied().unwrap_or(20);
        let start = (page - 1) * limit;
        let end = (start + limit).min(5);
        Json((start..end).map(|i| user_dto(&i.to_string())).collect())
    }

    async fn notifications_handler(headers: HeaderMap) -> Response {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer tok-1") => Json(vec![NotificationDto {
                id: "n1".into(),
                kind: "LIKE".into(),
                message: "alice liked your post".into(),
                actor: author(),
                post_id: Some("p1".into()),
                read: false,
                created_at: "2024-01-01T00:00:00Z".into(),
            }])
            .into_response(),
            _ => (StatusCode::UNAUTHORIZED, "missing token").into_response(),
        }
    }

    async fn upload_handler(State(rec): State<Shared>, mut form: Multipart) -> Json<PostDto> {
        let mut fields = HashMap::new();
        while let Some(field) = form.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let value = if name == "image" {
                format!("{} bytes", field.bytes().await.unwrap().len())
            } else {
                field.text().await.unwrap()
            };
            fields.insert(name, value);
        }
        let title = fields.get("title").cloned().unwrap_or_default();
        rec.lock().unwrap().uploads.push(fields);
        Json(post_dto("new", &title))
    }

    struct TestServer {
        base_url: String,
        recorded: Shared,
    }

    async fn start_test_server() -> TestServer {
        let recorded: Shared = Arc::new(Mutex::new(Recorded::default()));

        let app = Router::new()
            .route("/auth/login", post(login_handler))
            .route("/posts", get(feed_handler).post(upload_handler))
            .route("/posts/search", get(search_handler))
            .route("/posts/:id", get(post_handler))
            .route("/likes", post(like_handler))
            .route("/likes/:user/:post", delete(unlike_handler))
            .route("/users/:id", get(user_handler))
            .route("/users/:id/followers", get(followers_handler))
            .route("/users/:id/notifications", get(notifications_handler))
            .with_state(recorded.clone());

        // Bind to random port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            base_url: format!("http://{}", addr),
            recorded,
        }
    }

    fn client(server: &TestServer, ts: Arc<dyn TokenSource>) -> ApiClient {
        ApiClient::new(&server.base_url, ts, Duration::from_secs(5)).unwrap()
    }

    // =====================================================================
    // Tests
    // =====================================================================

    #[tokio::test]
    async fn login_success_and_rejection() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));

        let ok = api
            .login(&LoginRequest { username: "alice".into(), password: "secret".into() })
            .await;
        let auth = ok.success().expect("login should succeed");
        assert_eq!(auth.token, "tok-1");
        assert_eq!(auth.user.id, "u1");

        let bad = api
            .login(&LoginRequest { username: "alice".into(), password: "wrong".into() })
            .await;
        match bad {
            NetworkResult::Error { message, code } => {
                assert_eq!(message, "invalid credentials");
                assert_eq!(code, Some(401));
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_feed_and_single_post() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));

        let feed = api.fetch_feed().await.success().unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].author.username, "alice");

        let post = api.fetch_post("p1").await.success().unwrap();
        assert_eq!(post.title, "First");

        match api.fetch_post("missing").await {
            NetworkResult::Error { message, code } => {
                assert_eq!(message, "post not found");
                assert_eq!(code, Some(404));
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_an_exception() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));
        assert!(matches!(
            api.fetch_user("garbage").await,
            NetworkResult::Exception(ApiError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_exception() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = ApiClient::new(format!("http://{}", addr), Arc::new(NoAuth), Duration::from_secs(2)).unwrap();
        assert!(matches!(api.fetch_feed().await, NetworkResult::Exception(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn like_and_unlike_hit_expected_routes() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));
        let req = LikeRequest { user_id: "u1".into(), post_id: "p9".into() };

        assert!(api.like(&req).await.is_success());
        assert!(api.unlike(&req).await.is_success());

        let rec = server.recorded.lock().unwrap();
        assert_eq!(rec.likes, vec![req.clone()]);
        assert_eq!(rec.unlikes, vec![("u1".to_string(), "p9".to_string())]);
    }

    #[tokio::test]
    async fn ids_stay_single_path_segments() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));
        let req = LikeRequest { user_id: "u1".into(), post_id: "1/views?x".into() };

        assert!(api.unlike(&req).await.is_success());
        let rec = server.recorded.lock().unwrap();
        assert_eq!(rec.unlikes, vec![("u1".to_string(), "1/views?x".to_string())]);
    }

    #[test]
    fn endpoints_extend_the_base_path() {
        let api = ApiClient::new("https://blog.test/api/", Arc::new(NoAuth), Duration::from_secs(1)).unwrap();
        assert_eq!(api.url(&["posts"]).as_str(), "https://blog.test/api/posts");
        assert_eq!(
            api.url(&["posts", "a/b?c", "views"]).as_str(),
            "https://blog.test/api/posts/a%2Fb%3Fc/views"
        );
    }

    #[test]
    fn malformed_server_url_is_rejected() {
        let result = ApiClient::new("not a url", Arc::new(NoAuth), Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn paged_listing_sends_page_and_limit() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));

        let first = api.fetch_followers("u1", 1, 3).await.success().unwrap();
        let second = api.fetch_followers("u1", 2, 3).await.success().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].id, "3");
    }

    #[tokio::test]
    async fn search_passes_query() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));
        let hits = api.search_posts("Rust").await.success().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p1");
    }

    #[tokio::test]
    async fn bearer_token_is_attached() {
        let server = start_test_server().await;

        let anon = client(&server, Arc::new(NoAuth));
        match anon.fetch_notifications("u1").await {
            NetworkResult::Error { message, code } => {
                assert_eq!(code, Some(401));
                // Non-JSON bodies pass through verbatim.
                assert_eq!(message, "missing token");
            }
            other => panic!("expected Error, got {:?}", other),
        }

        let authed = client(&server, Arc::new(StaticToken::new("tok-1")));
        let list = authed.fetch_notifications("u1").await.success().unwrap();
        assert_eq!(list[0].kind, "LIKE");

        let session = Arc::new(SessionToken::new());
        let api = client(&server, session.clone());
        assert!(!api.fetch_notifications("u1").await.is_success());
        session.set(Some("tok-1".into()));
        assert!(api.fetch_notifications("u1").await.is_success());
    }

    #[tokio::test]
    async fn upload_post_sends_multipart_fields() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));

        let created = api
            .upload_post(NewPost {
                title: "Hello".into(),
                body: "World".into(),
                author_id: "u1".into(),
                image: Some(ImageUpload {
                    file_name: "pic.png".into(),
                    content_type: "image/png".into(),
                    bytes: vec![1, 2, 3, 4],
                }),
            })
            .await
            .success()
            .unwrap();
        assert_eq!(created.title, "Hello");

        let rec = server.recorded.lock().unwrap();
        let fields = &rec.uploads[0];
        assert_eq!(fields.get("body").map(String::as_str), Some("World"));
        assert_eq!(fields.get("author_id").map(String::as_str), Some("u1"));
        assert_eq!(fields.get("image").map(String::as_str), Some("4 bytes"));
    }

    #[tokio::test]
    async fn bad_image_content_type_is_rejected_locally() {
        let server = start_test_server().await;
        let api = client(&server, Arc::new(NoAuth));
        let result = api
            .upload_post(NewPost {
                title: "x".into(),
                body: "y".into(),
                author_id: "u1".into(),
                image: Some(ImageUpload {
                    file_name: "pic".into(),
                    content_type: "not a mime".into(),
                    bytes: vec![],
                }),
            })
            .await;
        assert!(matches!(result, NetworkResult::Exception(ApiError::InvalidRequest(_))));
        assert!(server.recorded.lock().unwrap().uploads.is_empty());
    }
}
