//! Wire shapes to local models.

use quill_client::{AuthResponse, AuthorDto, CommentDto, NotificationDto, PostDto, ReplyDto, UserDto};
use quill_core::{Comment, Notification, NotificationKind, Post, Reply, SessionUser, User};

fn display_name(name: &str, username: &str) -> String {
    if name.trim().is_empty() {
        username.to_string()
    } else {
        name.to_string()
    }
}

pub fn post_from_dto(dto: PostDto) -> Post {
    let AuthorDto { id, username, display_name: name, avatar_url } = dto.author;
    Post {
        updated_at: dto.updated_at.unwrap_or_else(|| dto.created_at.clone()),
        id: dto.id,
        title: dto.title,
        body: dto.body,
        author_display_name: display_name(&name, &username),
        author_id: id,
        author_username: username,
        author_avatar: avatar_url,
        image_url: dto.image_url,
        created_at: dto.created_at,
        like_count: dto.likes_count,
        view_count: dto.views_count,
        comment_count: dto.comments_count,
    }
}

pub fn posts_from_dtos(dtos: Vec<PostDto>) -> Vec<Post> {
    dtos.into_iter().map(post_from_dto).collect()
}

pub fn user_from_dto(dto: UserDto) -> User {
    User {
        display_name: display_name(&dto.display_name, &dto.username),
        id: dto.id,
        username: dto.username,
        avatar_url: dto.avatar_url,
        bio: dto.bio,
        post_count: dto.posts_count,
        follower_count: dto.followers_count,
        following_count: dto.following_count,
    }
}

pub fn session_from_auth(resp: AuthResponse) -> SessionUser {
    SessionUser {
        user: user_from_dto(resp.user),
        token: resp.token,
    }
}

pub fn comment_from_dto(dto: CommentDto) -> Comment {
    Comment {
        id: dto.id,
        post_id: dto.post_id,
        author_id: dto.author.id,
        author_username: dto.author.username,
        body: dto.body,
        reply_count: dto.replies_count,
        created_at: dto.created_at,
    }
}

pub fn reply_from_dto(dto: ReplyDto) -> Reply {
    Reply {
        id: dto.id,
        comment_id: dto.comment_id,
        author_id: dto.author.id,
        author_username: dto.author.username,
        body: dto.body,
        created_at: dto.created_at,
    }
}

pub fn notification_from_dto(dto: NotificationDto) -> Notification {
    // Kinds arrive as free-form strings; unknown ones become `Other`.
    let kind = serde_json::from_value::<NotificationKind>(serde_json::Value::String(
        dto.kind.to_ascii_uppercase(),
    ))
    .unwrap_or(NotificationKind::Other);

    Notification {
        id: dto.id,
        kind,
        message: dto.message,
        actor_id: dto.actor.id,
        actor_username: dto.actor.username,
        post_id: dto.post_id,
        read: dto.read,
        created_at: dto.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str) -> AuthorDto {
        AuthorDto {
            id: "u1".into(),
            username: "alice".into(),
            display_name: name.into(),
            avatar_url: Some("https://cdn/a.png".into()),
        }
    }

    #[test]
    fn post_flattens_author_and_defaults_updated_at() {
        let post = post_from_dto(PostDto {
            id: "p1".into(),
            title: "Hello".into(),
            body: "World".into(),
            author: author(""),
            image_url: None,
            created_at: "2024-05-01T10:00:00Z".into(),
            updated_at: None,
            likes_count: 4,
            views_count: 9,
            comments_count: 2,
        });
        assert_eq!(post.author_id, "u1");
        assert_eq!(post.author_display_name, "alice");
        assert_eq!(post.author_avatar.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(post.updated_at, "2024-05-01T10:00:00Z");
        assert_eq!((post.like_count, post.view_count, post.comment_count), (4, 9, 2));
    }

    #[test]
    fn notification_kind_is_case_insensitive() {
        let dto = |kind: &str| NotificationDto {
            id: "n".into(),
            kind: kind.into(),
            message: "m".into(),
            actor: author("Alice"),
            post_id: None,
            read: true,
            created_at: "t".into(),
        };
        assert_eq!(notification_from_dto(dto("follow")).kind, NotificationKind::Follow);
        assert_eq!(notification_from_dto(dto("COMMENT")).kind, NotificationKind::Comment);
        assert_eq!(notification_from_dto(dto("mention")).kind, NotificationKind::Other);
    }
}
