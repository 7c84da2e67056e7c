//! Compose and drafts: `compose/state`, `drafts/state`.

use quill_core::{Draft, Post};

use super::ui::UiState;

/// Publishing a new post (directly or from a draft).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposeState {
    /// `Success` carries the post the server created.
    pub status: UiState<Post>,
}

impl ComposeState {
    pub const PATH: &'static str = "compose/state";
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftsState {
    pub drafts: UiState<Vec<Draft>>,
    /// The draft written by the last save.
    pub last_saved: Option<Draft>,
}

impl DraftsState {
    pub const PATH: &'static str = "drafts/state";
}
