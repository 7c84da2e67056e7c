use std::path::Path;
use std::sync::Arc;

use quill_client::NetworkResult;
use quill_core::{new_id, now_rfc3339, Draft, Post};
use tokio::sync::watch;
use tracing::info;

use super::post::PostRepository;
use crate::error::DataError;
use crate::local::DraftStore;

/// Locally owned drafts and publishing them as posts.
pub struct DraftRepository {
    drafts: DraftStore,
    posts: Arc<PostRepository>,
}

impl DraftRepository {
    pub fn new(drafts: DraftStore, posts: Arc<PostRepository>) -> Self {
        Self { drafts, posts }
    }

    pub fn create(&self, title: &str, body: &str, image_path: Option<String>) -> Result<Draft, DataError> {
        let now = now_rfc3339();
        let draft = Draft {
            id: new_id(),
            title: title.into(),
            body: body.into(),
            image_path,
            created_at: now.clone(),
            updated_at: now,
        };
        self.drafts.upsert(&draft)?;
        Ok(draft)
    }

    /// Save edits. The stored `created_at` is kept; `updated_at` is bumped.
    pub fn update(&self, draft: &Draft) -> Result<Draft, DataError> {
        let existing = self
            .drafts
            .get(&draft.id)?
            .ok_or_else(|| DataError::NotFound(format!("draft {}", draft.id)))?;
        let updated = Draft {
            created_at: existing.created_at,
            updated_at: now_rfc3339(),
            ..draft.clone()
        };
        self.drafts.upsert(&updated)?;
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Result<Option<Draft>, DataError> {
        self.drafts.get(id)
    }

    pub fn list(&self) -> Result<Vec<Draft>, DataError> {
        self.drafts.all()
    }

    pub fn watch(&self) -> Result<watch::Receiver<Vec<Draft>>, DataError> {
        self.drafts.watch_all()
    }

    pub fn delete(&self, id: &str) -> Result<(), DataError> {
        self.drafts.delete(id)
    }

    /// Upload the draft as a post. The draft is deleted only when the
    /// upload succeeds.
    pub async fn publish(&self, id: &str, author_id: &str) -> Result<NetworkResult<Post>, DataError> {
        let draft = self
            .drafts
            .get(id)?
            .ok_or_else(|| DataError::NotFound(format!("draft {}", id)))?;

        let result = self
            .posts
            .upload_post(&draft.title, &draft.body, author_id, draft.image_path.as_deref().map(Path::new))
            .await?;

        if let NetworkResult::Success(post) = &result {
            self.drafts.delete(id)?;
            info!(draft = %id, post = %post.id, "draft published");
        }
        Ok(result)
    }
}
