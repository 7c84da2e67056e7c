//! Quill screens as Flux state holders.
//!
//! Structure:
//! - `state/`: one state type per screen, stored at a well-known path
//! - `request/`: typed request payloads, one path each
//! - `handlers/`: handler implementations and the Flux wiring
//!
//! A [`QuillApp`] is built per session and closed explicitly by its owner.
//! Closing aborts live subscriptions and in-flight background work.

pub mod app;
pub mod handlers;
pub mod request;
pub mod state;

pub use app::QuillApp;
pub use handlers::{register_handlers, QuillContext};
pub use request::Request;
