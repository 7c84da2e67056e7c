//! Publishing and draft commands.

use std::path::PathBuf;

use anyhow::Result;
use quill_app::request::{DeleteDraftReq, OpenDraftsReq, PublishDraftReq, PublishReq, SaveDraftReq};
use quill_app::state::{ComposeState, DraftsState, UiState};
use quill_app::QuillApp;

use super::{loaded, print_message};

fn published(app: &QuillApp) -> Result<()> {
    match app.get::<ComposeState>(ComposeState::PATH).map(|s| s.status) {
        Some(UiState::Success(post)) => {
            println!("Published {} ({})", post.title, post.id);
            Ok(())
        }
        Some(UiState::Error(e)) => anyhow::bail!("{}", e),
        _ => {
            print_message(app);
            anyhow::bail!("not published")
        }
    }
}

pub async fn publish(app: &QuillApp, title: &str, body: &str, image: Option<String>) -> Result<()> {
    app.send(PublishReq {
        title: title.to_string(),
        body: body.to_string(),
        image_path: image.map(PathBuf::from),
    })
    .await;
    published(app)
}

pub async fn new_draft(app: &QuillApp, title: &str, body: &str, image: Option<String>) -> Result<()> {
    app.send(SaveDraftReq { id: None, title: title.to_string(), body: body.to_string(), image_path: image })
        .await;
    match app.get::<DraftsState>(DraftsState::PATH).and_then(|s| s.last_saved) {
        Some(draft) => println!("Draft saved: {}", draft.id),
        None => print_message(app),
    }
    Ok(())
}

pub async fn list_drafts(app: &QuillApp) -> Result<()> {
    app.send(OpenDraftsReq).await;
    let state = app.get::<DraftsState>(DraftsState::PATH);
    let drafts = loaded(app, state.as_ref().map(|s| &s.drafts))?;
    if drafts.is_empty() {
        println!("No drafts.");
    }
    for d in drafts {
        let title = if d.title.is_empty() { "(untitled)" } else { d.title.as_str() };
        println!("{:<36} {:<40} {}", d.id, title, d.updated_at);
    }
    Ok(())
}

pub async fn delete_draft(app: &QuillApp, id: &str) -> Result<()> {
    app.send(DeleteDraftReq { id: id.to_string() }).await;
    print_message(app);
    Ok(())
}

pub async fn publish_draft(app: &QuillApp, id: &str) -> Result<()> {
    app.send(PublishDraftReq { id: id.to_string() }).await;
    published(app)
}
