//! Compose and draft requests.

use std::path::PathBuf;

use super::request_path;

/// Publish a new post, with an optional image file.
#[derive(Debug, Clone)]
pub struct PublishReq {
    pub title: String,
    pub body: String,
    pub image_path: Option<PathBuf>,
}

/// Start following the drafts table.
#[derive(Debug, Clone, Default)]
pub struct OpenDraftsReq;

/// Create a draft (`id: None`) or overwrite an existing one.
#[derive(Debug, Clone)]
pub struct SaveDraftReq {
    pub id: Option<String>,
    pub title: String,
    pub body: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteDraftReq {
    pub id: String,
}

/// Upload a draft; the draft is removed once the server accepts it.
#[derive(Debug, Clone)]
pub struct PublishDraftReq {
    pub id: String,
}

request_path! {
    PublishReq => "compose/publish",
    OpenDraftsReq => "drafts/open",
    SaveDraftReq => "draft/save",
    DeleteDraftReq => "draft/delete",
    PublishDraftReq => "draft/publish",
}
