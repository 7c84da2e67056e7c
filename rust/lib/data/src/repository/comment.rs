use std::sync::Arc;

use quill_client::{CommentRequest, NetworkResult};
use quill_core::{Comment, Reply};

use crate::mapper;
use crate::remote::RemoteDataSource;

/// Comment and reply mutations. Listings go through the paging sources.
pub struct CommentRepository {
    remote: Arc<dyn RemoteDataSource>,
}

impl CommentRepository {
    pub fn new(remote: Arc<dyn RemoteDataSource>) -> Self {
        Self { remote }
    }

    pub async fn add_comment(&self, post_id: &str, user_id: &str, body: &str) -> NetworkResult<Comment> {
        let req = CommentRequest { user_id: user_id.into(), body: body.into() };
        self.remote.add_comment(post_id, &req).await.map(mapper::comment_from_dto)
    }

    pub async fn delete_comment(&self, comment_id: &str) -> NetworkResult<()> {
        self.remote.delete_comment(comment_id).await
    }

    pub async fn add_reply(&self, comment_id: &str, user_id: &str, body: &str) -> NetworkResult<Reply> {
        let req = CommentRequest { user_id: user_id.into(), body: body.into() };
        self.remote.add_reply(comment_id, &req).await.map(mapper::reply_from_dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRemote;

    #[tokio::test]
    async fn comment_and_reply_round_trip_through_remote() {
        let remote = Arc::new(FakeRemote::new());
        let repo = CommentRepository::new(remote.clone());

        let c = repo.add_comment("p1", "u1", "nice").await.success().unwrap();
        assert_eq!((c.post_id.as_str(), c.author_id.as_str(), c.body.as_str()), ("p1", "u1", "nice"));

        let r = repo.add_reply(&c.id, "u2", "thanks").await.success().unwrap();
        assert_eq!(r.comment_id, c.id);

        assert!(repo.delete_comment(&c.id).await.is_success());
        assert_eq!(
            remote.calls(),
            vec!["add_comment:p1:u1", "add_reply:new-comment:u2", "delete_comment:new-comment"]
        );
    }
}
