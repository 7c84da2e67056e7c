use std::collections::HashSet;
use std::sync::Arc;

use quill_core::{now_rfc3339, Post};
use quill_sql::SQLStore;
use tokio::sync::watch;

use super::{decode, decode_all, live_query};
use crate::error::DataError;

const TABLE: &str = "saved_posts";

fn load_all(db: &dyn SQLStore) -> Result<Vec<Post>, DataError> {
    let rows = db.query("SELECT data FROM saved_posts ORDER BY saved_at DESC, id ASC", &[])?;
    decode_all(&rows)
}

fn load_ids(db: &dyn SQLStore) -> Result<HashSet<String>, DataError> {
    let rows = db.query("SELECT id FROM saved_posts", &[])?;
    rows.iter()
        .map(|r| -> Result<String, DataError> { Ok(r.text("id")?.to_string()) })
        .collect()
}

/// Posts the user pinned. Independent of the feed cache.
#[derive(Clone)]
pub struct SavedPostStore {
    db: Arc<dyn SQLStore>,
}

impl SavedPostStore {
    pub(crate) fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    pub fn get(&self, id: &str) -> Result<Option<Post>, DataError> {
        let rows = self
            .db
            .query("SELECT data FROM saved_posts WHERE id = ?1", &[id.into()])?;
        rows.first().map(decode).transpose()
    }

    /// Saved posts, most recently saved first.
    pub fn all(&self) -> Result<Vec<Post>, DataError> {
        load_all(self.db.as_ref())
    }

    pub fn ids(&self) -> Result<HashSet<String>, DataError> {
        load_ids(self.db.as_ref())
    }

    pub fn watch_all(&self) -> Result<watch::Receiver<Vec<Post>>, DataError> {
        live_query(&self.db, TABLE, load_all)
    }

    pub fn watch_ids(&self) -> Result<watch::Receiver<HashSet<String>>, DataError> {
        live_query(&self.db, TABLE, load_ids)
    }

    pub fn insert(&self, post: &Post) -> Result<(), DataError> {
        self.db.exec(
            "INSERT OR REPLACE INTO saved_posts (id, saved_at, data) VALUES (?1, ?2, ?3)",
            &[
                post.id.as_str().into(),
                now_rfc3339().into(),
                serde_json::to_string(post)?.into(),
            ],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), DataError> {
        self.db.exec("DELETE FROM saved_posts WHERE id = ?1", &[id.into()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::local::LocalDb;
    use crate::testing::post;

    #[test]
    fn saved_is_independent_of_cache() {
        let db = LocalDb::open_in_memory().unwrap();
        db.saved.insert(&post("3", "Saved")).unwrap();
        db.cached.delete_all().unwrap();

        assert_eq!(db.saved.get("3").unwrap().unwrap().title, "Saved");
        assert!(db.cached.get("3").unwrap().is_none());
    }

    #[test]
    fn ids_track_insert_and_delete() {
        let db = LocalDb::open_in_memory().unwrap();
        db.saved.insert(&post("1", "A")).unwrap();
        db.saved.insert(&post("2", "B")).unwrap();
        assert_eq!(db.saved.ids().unwrap().len(), 2);

        db.saved.delete("1").unwrap();
        let ids = db.saved.ids().unwrap();
        assert!(!ids.contains("1"));
        assert!(ids.contains("2"));
        assert_eq!(db.saved.all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn watch_ids_follows_writes() {
        let db = LocalDb::open_in_memory().unwrap();
        let mut rx = db.saved.watch_ids().unwrap();

        db.saved.insert(&post("7", "X")).unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().contains("7"));
    }
}
