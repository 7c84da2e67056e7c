//! App-level state: stored at `app/message`.

/// One-shot message for a snackbar/toast. The latest message wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppMessage(pub String);

impl AppMessage {
    pub const PATH: &'static str = "app/message";
}
