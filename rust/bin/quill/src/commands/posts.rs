//! Feed, post and search commands.

use anyhow::Result;
use quill_app::request::{
    LikePostReq, OpenFeedReq, OpenPostReq, OpenSavedReq, SavePostReq, SearchReq, SyncFeedReq, UnlikePostReq,
    UnsavePostReq,
};
use quill_app::state::{FeedState, PostDetail, SavedState, SearchState, UiState};
use quill_app::QuillApp;
use quill_core::Post;

use super::{loaded, print_message};

fn print_row(post: &Post, marks: &str) {
    println!(
        "{:<24} {:<3} {:<40} @{:<16} {:>4} likes {:>4} comments",
        post.id, marks, post.title, post.author_username, post.like_count, post.comment_count
    );
}

pub async fn feed(app: &QuillApp, sync: bool) -> Result<()> {
    if sync {
        app.send(SyncFeedReq).await;
        print_message(app);
    }
    app.send(OpenFeedReq).await;
    let state = app.get::<FeedState>(FeedState::PATH);
    let posts = loaded(app, state.as_ref().map(|s| &s.posts))?;
    if posts.is_empty() {
        println!("Feed is empty. Run `quill feed --sync`.");
    }
    for p in posts {
        let marks = format!(
            "{}{}",
            if p.is_saved { "S" } else { "" },
            if p.is_own { "*" } else { "" }
        );
        print_row(&p.post, &marks);
    }
    Ok(())
}

pub async fn show(app: &QuillApp, id: &str) -> Result<()> {
    app.send(OpenPostReq { post_id: id.to_string() }).await;
    let detail = app.get::<PostDetail>(PostDetail::PATH).map(|d| d.post);
    match detail {
        Some(UiState::Success(view)) => {
            let p = &view.post;
            println!("{}", p.title);
            println!("by {} (@{}) at {}", p.author_display_name, p.author_username, p.created_at);
            if let Some(url) = &p.image_url {
                println!("image: {}", url);
            }
            println!();
            println!("{}", p.body);
            println!();
            println!(
                "likes {}{}  views {}  comments {}{}",
                p.like_count,
                if view.is_liked { " (you)" } else { "" },
                p.view_count,
                p.comment_count,
                if view.is_saved { "  [saved]" } else { "" },
            );
            Ok(())
        }
        Some(UiState::Error(e)) => anyhow::bail!("{}", e),
        _ => anyhow::bail!("post {} not found", id),
    }
}

pub async fn like(app: &QuillApp, id: &str, like: bool) -> Result<()> {
    app.send(OpenPostReq { post_id: id.to_string() }).await;
    if like {
        app.send(LikePostReq { post_id: id.to_string() }).await;
    } else {
        app.send(UnlikePostReq { post_id: id.to_string() }).await;
    }
    let liked = app
        .get::<PostDetail>(PostDetail::PATH)
        .and_then(|d| d.post.data().map(|v| v.is_liked));
    match liked {
        Some(l) if l == like => println!("{}", if like { "Liked" } else { "Unliked" }),
        _ => print_message(app),
    }
    Ok(())
}

pub async fn save(app: &QuillApp, id: &str, save: bool) -> Result<()> {
    if save {
        app.send(SavePostReq { post_id: id.to_string() }).await;
    } else {
        app.send(UnsavePostReq { post_id: id.to_string() }).await;
    }
    print_message(app);
    Ok(())
}

pub async fn saved(app: &QuillApp) -> Result<()> {
    app.send(OpenSavedReq).await;
    let state = app.get::<SavedState>(SavedState::PATH);
    let posts = loaded(app, state.as_ref().map(|s| &s.posts))?;
    if posts.is_empty() {
        println!("No saved posts.");
    }
    for p in posts {
        print_row(p, "S");
    }
    Ok(())
}

pub async fn search(app: &QuillApp, query: &str) -> Result<()> {
    app.send(SearchReq { query: query.to_string() }).await;
    let state = app.get::<SearchState>(SearchState::PATH);
    let posts = loaded(app, state.as_ref().map(|s| &s.results))?;
    if posts.is_empty() {
        println!("No posts match \"{}\".", query.trim());
    }
    for p in posts {
        print_row(p, "");
    }
    Ok(())
}
