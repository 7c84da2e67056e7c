//! Flux: path-addressed screen state for the Quill client.
//!
//! Screens keep their UI state in a flat path namespace (`feed/state`,
//! `post/detail`, `app/message`). Requests are emitted to a path and
//! routed to async handlers; handlers write state; subscribers observe it.
//!
//! - `get(path)`: read state at a path
//! - `emit(path, payload)`: send a request to matching handler(s)
//! - `subscribe(pattern)`: observe state changes
//!
//! Patterns use `+` for one segment and a trailing `#` for any remainder:
//! `feed/+` matches `feed/state`, `profile/#` matches everything under
//! `profile/`, and `#` matches every path.
//!
//! Background work started on behalf of a screen is owned by a
//! [`TaskScope`] and aborted when the scope is closed.

pub mod app;
pub mod pattern;
pub mod router;
pub mod store;
pub mod tasks;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Router};
pub use store::{ChangeHandler, StateStore};
pub use tasks::TaskScope;
pub use value::{StateValue, SubscriptionId};
