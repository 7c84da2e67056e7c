//! Follow, profile, listing and notification commands.

use anyhow::Result;
use quill_app::request::{
    AddCommentReq, AddReplyReq, CommentsReq, FollowUserReq, FollowersReq, FollowingReq, LoadNotificationsReq,
    LoadProfileReq, PageAction, RepliesReq, Request, UnfollowUserReq,
};
use quill_app::state::{
    CommentsList, ListState, NotificationsState, ProfilePostsList, ProfileState, RepliesList, UiState,
};
use quill_app::QuillApp;
use quill_core::User;

use super::{loaded, print_message, print_more};

/// Load the first page, then up to `pages - 1` more while the listing has
/// further pages.
async fn page_through<T, R>(app: &QuillApp, path: &str, pages: u32, req: impl Fn(PageAction) -> R) -> ListState<T>
where
    T: Clone + Send + Sync + 'static,
    R: Request,
{
    app.send(req(PageAction::Refresh)).await;
    for _ in 1..pages.max(1) {
        let state = app.get::<ListState<T>>(path).unwrap_or_default();
        if state.complete || state.error.is_some() || state.items.error().is_some() {
            break;
        }
        app.send(req(PageAction::Next)).await;
    }
    app.get::<ListState<T>>(path).unwrap_or_default()
}

fn print_users(app: &QuillApp, list: &ListState<User>) -> Result<()> {
    let users = loaded(app, Some(&list.items))?;
    if users.is_empty() {
        println!("Nobody yet.");
    }
    for u in users {
        println!("{:<24} @{:<20} {}", u.id, u.username, u.display_name);
    }
    print_more(list.complete, list.error.as_deref());
    Ok(())
}

pub async fn follow(app: &QuillApp, user: &str, follow: bool) -> Result<()> {
    if follow {
        app.send(FollowUserReq { user_id: user.to_string() }).await;
    } else {
        app.send(UnfollowUserReq { user_id: user.to_string() }).await;
    }
    print_message(app);
    Ok(())
}

pub async fn profile(app: &QuillApp, user: &str) -> Result<()> {
    app.send(LoadProfileReq { user_id: user.to_string() }).await;
    let state = app.get::<ProfileState>(ProfileState::PATH).unwrap_or_default();
    let u = match state.user {
        UiState::Success(u) => u,
        UiState::Error(e) => anyhow::bail!("{}", e),
        _ => anyhow::bail!("profile {} not loaded", user),
    };
    println!("{} (@{}){}", u.display_name, u.username, if state.is_self { "  [you]" } else { "" });
    if let Some(bio) = &u.bio {
        println!("{}", bio);
    }
    println!(
        "{} posts  {} followers  {} following",
        u.post_count, u.follower_count, u.following_count
    );
    println!();

    let posts = app.get::<ProfilePostsList>(ProfilePostsList::PATH).unwrap_or_default();
    for p in loaded(app, Some(&posts.items))? {
        println!("{:<24} {}", p.id, p.title);
    }
    print_more(posts.complete, posts.error.as_deref());
    Ok(())
}

pub async fn followers(app: &QuillApp, user: &str, pages: u32) -> Result<()> {
    let list: ListState<User> = page_through(app, ListState::<User>::FOLLOWERS_PATH, pages, |action| FollowersReq {
        user_id: user.to_string(),
        action,
    })
    .await;
    print_users(app, &list)
}

pub async fn following(app: &QuillApp, user: &str, pages: u32) -> Result<()> {
    let list: ListState<User> = page_through(app, ListState::<User>::FOLLOWING_PATH, pages, |action| FollowingReq {
        user_id: user.to_string(),
        action,
    })
    .await;
    print_users(app, &list)
}

pub async fn comments(app: &QuillApp, post: &str, pages: u32) -> Result<()> {
    let list: CommentsList = page_through(app, CommentsList::PATH, pages, |action| CommentsReq {
        post_id: post.to_string(),
        action,
    })
    .await;
    let comments = loaded(app, Some(&list.items))?;
    if comments.is_empty() {
        println!("No comments.");
    }
    for c in comments {
        println!("[{}] @{}: {} ({} replies)", c.id, c.author_username, c.body, c.reply_count);
    }
    print_more(list.complete, list.error.as_deref());
    Ok(())
}

pub async fn replies(app: &QuillApp, comment: &str, pages: u32) -> Result<()> {
    let list: RepliesList = page_through(app, RepliesList::PATH, pages, |action| RepliesReq {
        comment_id: comment.to_string(),
        action,
    })
    .await;
    let replies = loaded(app, Some(&list.items))?;
    if replies.is_empty() {
        println!("No replies.");
    }
    for r in replies {
        println!("[{}] @{}: {}", r.id, r.author_username, r.body);
    }
    print_more(list.complete, list.error.as_deref());
    Ok(())
}

pub async fn comment(app: &QuillApp, post: &str, text: &str) -> Result<()> {
    app.send(AddCommentReq { post_id: post.to_string(), body: text.to_string() }).await;
    print_message(app);
    Ok(())
}

pub async fn reply(app: &QuillApp, comment: &str, text: &str) -> Result<()> {
    app.send(AddReplyReq { comment_id: comment.to_string(), body: text.to_string() }).await;
    print_message(app);
    Ok(())
}

pub async fn notifications(app: &QuillApp) -> Result<()> {
    app.send(LoadNotificationsReq).await;
    let state = app.get::<NotificationsState>(NotificationsState::PATH);
    let list = loaded(app, state.as_ref().map(|s| &s.notifications))?;
    if list.is_empty() {
        println!("No notifications.");
    }
    for n in list {
        println!(
            "{} {:<8} @{:<16} {}",
            if n.read { " " } else { "*" },
            n.kind.as_str(),
            n.actor_username,
            n.message
        );
    }
    Ok(())
}
