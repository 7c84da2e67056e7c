use quill_client::*;

/// Everything the repositories need from the server.
///
/// `ApiClient` is the production implementation; tests substitute fakes.
#[async_trait::async_trait]
pub trait RemoteDataSource: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> NetworkResult<AuthResponse>;
    async fn register(&self, req: &RegisterRequest) -> NetworkResult<AuthResponse>;

    async fn fetch_feed(&self) -> NetworkResult<Vec<PostDto>>;
    async fn fetch_post(&self, id: &str) -> NetworkResult<PostDto>;
    async fn delete_post(&self, id: &str) -> NetworkResult<()>;
    async fn add_view(&self, req: &ViewRequest) -> NetworkResult<()>;
    async fn search_posts(&self, query: &str) -> NetworkResult<Vec<PostDto>>;
    async fn upload_post(&self, post: NewPost) -> NetworkResult<PostDto>;

    async fn like(&self, req: &LikeRequest) -> NetworkResult<()>;
    async fn unlike(&self, req: &LikeRequest) -> NetworkResult<()>;
    async fn follow(&self, req: &FollowRequest) -> NetworkResult<()>;
    async fn unfollow(&self, req: &FollowRequest) -> NetworkResult<()>;

    async fn fetch_user(&self, id: &str) -> NetworkResult<UserDto>;
    async fn fetch_followers(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>>;
    async fn fetch_following(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>>;
    async fn fetch_user_posts(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<PostDto>>;
    async fn fetch_notifications(&self, user_id: &str) -> NetworkResult<Vec<NotificationDto>>;

    async fn fetch_comments(&self, post_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<CommentDto>>;
    async fn add_comment(&self, post_id: &str, req: &CommentRequest) -> NetworkResult<CommentDto>;
    async fn delete_comment(&self, id: &str) -> NetworkResult<()>;
    async fn fetch_replies(&self, comment_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<ReplyDto>>;
    async fn add_reply(&self, comment_id: &str, req: &CommentRequest) -> NetworkResult<ReplyDto>;
}

#[async_trait::async_trait]
impl RemoteDataSource for ApiClient {
    async fn login(&self, req: &LoginRequest) -> NetworkResult<AuthResponse> {
        ApiClient::login(self, req).await
    }

    async fn register(&self, req: &RegisterRequest) -> NetworkResult<AuthResponse> {
        ApiClient::register(self, req).await
    }

    async fn fetch_feed(&self) -> NetworkResult<Vec<PostDto>> {
        ApiClient::fetch_feed(self).await
    }

    async fn fetch_post(&self, id: &str) -> NetworkResult<PostDto> {
        ApiClient::fetch_post(self, id).await
    }

    async fn delete_post(&self, id: &str) -> NetworkResult<()> {
        ApiClient::delete_post(self, id).await
    }

    async fn add_view(&self, req: &ViewRequest) -> NetworkResult<()> {
        ApiClient::add_view(self, req).await
    }

    async fn search_posts(&self, query: &str) -> NetworkResult<Vec<PostDto>> {
        ApiClient::search_posts(self, query).await
    }

    async fn upload_post(&self, post: NewPost) -> NetworkResult<PostDto> {
        ApiClient::upload_post(self, post).await
    }

    async fn like(&self, req: &LikeRequest) -> NetworkResult<()> {
        ApiClient::like(self, req).await
    }

    async fn unlike(&self, req: &LikeRequest) -> NetworkResult<()> {
        ApiClient::unlike(self, req).await
    }

    async fn follow(&self, req: &FollowRequest) -> NetworkResult<()> {
        ApiClient::follow(self, req).await
    }

    async fn unfollow(&self, req: &FollowRequest) -> NetworkResult<()> {
        ApiClient::unfollow(self, req).await
    }

    async fn fetch_user(&self, id: &str) -> NetworkResult<UserDto> {
        ApiClient::fetch_user(self, id).await
    }

    async fn fetch_followers(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>> {
        ApiClient::fetch_followers(self, id, page, limit).await
    }

    async fn fetch_following(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<UserDto>> {
        ApiClient::fetch_following(self, id, page, limit).await
    }

    async fn fetch_user_posts(&self, id: &str, page: u32, limit: u32) -> NetworkResult<Vec<PostDto>> {
        ApiClient::fetch_user_posts(self, id, page, limit).await
    }

    async fn fetch_notifications(&self, user_id: &str) -> NetworkResult<Vec<NotificationDto>> {
        ApiClient::fetch_notifications(self, user_id).await
    }

    async fn fetch_comments(&self, post_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<CommentDto>> {
        ApiClient::fetch_comments(self, post_id, page, limit).await
    }

    async fn add_comment(&self, post_id: &str, req: &CommentRequest) -> NetworkResult<CommentDto> {
        ApiClient::add_comment(self, post_id, req).await
    }

    async fn delete_comment(&self, id: &str) -> NetworkResult<()> {
        ApiClient::delete_comment(self, id).await
    }

    async fn fetch_replies(&self, comment_id: &str, page: u32, limit: u32) -> NetworkResult<Vec<ReplyDto>> {
        ApiClient::fetch_replies(self, comment_id, page, limit).await
    }

    async fn add_reply(&self, comment_id: &str, req: &CommentRequest) -> NetworkResult<ReplyDto> {
        ApiClient::add_reply(self, comment_id, req).await
    }
}
