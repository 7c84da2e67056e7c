pub mod config;
pub mod model;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use model::{Comment, Draft, Notification, NotificationKind, Post, Reply, SessionUser, User};
pub use types::{new_id, now_rfc3339, DEFAULT_PAGE_SIZE};
