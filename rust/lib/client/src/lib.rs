//! Quill HTTP client.
//!
//! Every endpoint returns a [`NetworkResult`]: the payload on success, the
//! server's message and status on a rejected request, or the transport /
//! decode failure. Authentication is handled by a pluggable
//! [`TokenSource`].
//!
//! ```ignore
//! use quill_client::{ApiClient, SessionToken};
//!
//! let token = Arc::new(SessionToken::new());
//! let api = ApiClient::new("http://localhost:8080", token.clone(), Duration::from_secs(30))?;
//! let feed = api.fetch_feed().await;
//! ```

pub mod client;
pub mod dto;
pub mod error;
pub mod result;
pub mod token;

pub use client::ApiClient;
pub use dto::*;
pub use error::ApiError;
pub use result::NetworkResult;
pub use token::{NoAuth, SessionToken, StaticToken, TokenSource};
