pub mod auth;
pub mod compose;
pub mod context;
pub mod people;
pub mod posts;

use anyhow::Result;
use quill_app::state::{AppMessage, UiState};
use quill_app::QuillApp;

/// Print the latest app message, if any handler left one.
pub fn print_message(app: &QuillApp) {
    if let Some(AppMessage(msg)) = app.get::<AppMessage>(AppMessage::PATH) {
        println!("{}", msg);
    }
}

/// Items of a loaded list. An error state (or a missing one, when a handler
/// refused the request) fails the command.
pub fn loaded<'a, T>(app: &QuillApp, state: Option<&'a UiState<Vec<T>>>) -> Result<&'a [T]> {
    match state {
        Some(UiState::Error(e)) => anyhow::bail!("{}", e),
        Some(s) => Ok(s.items()),
        None => {
            print_message(app);
            anyhow::bail!("nothing loaded")
        }
    }
}

/// Print a paged listing with a trailer about further pages.
pub fn print_more(complete: bool, error: Option<&str>) {
    if let Some(e) = error {
        eprintln!("next page failed: {}", e);
    } else if !complete {
        println!("(more available, use --pages)");
    }
}
