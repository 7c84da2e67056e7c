//! SQLite-backed local stores.
//!
//! Rows keep the full model as a JSON `data` column next to the columns
//! needed for keys and ordering.

mod cached;
mod drafts;
mod likes;
mod live;
mod saved;

use std::path::Path;
use std::sync::Arc;

use quill_sql::{Row, SQLStore, SqliteStore};
use serde::de::DeserializeOwned;

use crate::error::DataError;

pub use cached::CachedPostStore;
pub use drafts::DraftStore;
pub use likes::LikeStore;
pub use live::live_query;
pub use saved::SavedPostStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cached_posts (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS saved_posts (
    id TEXT PRIMARY KEY,
    saved_at TEXT NOT NULL,
    data TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS likes (
    user_id TEXT NOT NULL,
    post_id TEXT NOT NULL,
    PRIMARY KEY (user_id, post_id)
);
CREATE TABLE IF NOT EXISTS drafts (
    id TEXT PRIMARY KEY,
    updated_at TEXT NOT NULL,
    data TEXT NOT NULL
);
";

/// The local database and the stores built on it.
#[derive(Clone)]
pub struct LocalDb {
    pub cached: CachedPostStore,
    pub saved: SavedPostStore,
    pub likes: LikeStore,
    pub drafts: DraftStore,
}

impl LocalDb {
    pub fn open(path: &Path) -> Result<Self, DataError> {
        Self::with_store(Arc::new(SqliteStore::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DataError> {
        Self::with_store(Arc::new(SqliteStore::open_in_memory()?))
    }

    pub fn with_store(db: Arc<dyn SQLStore>) -> Result<Self, DataError> {
        db.exec_batch(SCHEMA)?;
        Ok(Self {
            cached: CachedPostStore::new(db.clone()),
            saved: SavedPostStore::new(db.clone()),
            likes: LikeStore::new(db.clone()),
            drafts: DraftStore::new(db),
        })
    }
}

/// Decode the JSON `data` column of a row.
pub(crate) fn decode<T: DeserializeOwned>(row: &Row) -> Result<T, DataError> {
    Ok(serde_json::from_str(row.text("data")?)?)
}

pub(crate) fn decode_all<T: DeserializeOwned>(rows: &[Row]) -> Result<Vec<T>, DataError> {
    rows.iter().map(decode).collect()
}
