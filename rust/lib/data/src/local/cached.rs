use std::sync::Arc;

use quill_core::Post;
use quill_sql::{SQLStore, Value};
use tokio::sync::watch;

use super::{decode, decode_all, live_query};
use crate::error::DataError;

const TABLE: &str = "cached_posts";

/// Rows per multi-row INSERT.
const INSERT_CHUNK: usize = 500;

fn load_all(db: &dyn SQLStore) -> Result<Vec<Post>, DataError> {
    let rows = db.query(
        "SELECT data FROM cached_posts ORDER BY created_at DESC, id ASC",
        &[],
    )?;
    decode_all(&rows)
}

/// Mirror of the last successful feed sync.
#[derive(Clone)]
pub struct CachedPostStore {
    db: Arc<dyn SQLStore>,
}

impl CachedPostStore {
    pub(crate) fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    pub fn get(&self, id: &str) -> Result<Option<Post>, DataError> {
        let rows = self
            .db
            .query("SELECT data FROM cached_posts WHERE id = ?1", &[id.into()])?;
        rows.first().map(decode).transpose()
    }

    /// All cached posts, newest first.
    pub fn all(&self) -> Result<Vec<Post>, DataError> {
        load_all(self.db.as_ref())
    }

    pub fn watch_all(&self) -> Result<watch::Receiver<Vec<Post>>, DataError> {
        live_query(&self.db, TABLE, load_all)
    }

    /// Insert or replace by id.
    pub fn insert(&self, post: &Post) -> Result<(), DataError> {
        self.insert_all(std::slice::from_ref(post))
    }

    /// Insert or replace many posts, `INSERT_CHUNK` rows per statement.
    ///
    /// Each row binds three parameters; chunking keeps a statement well under
    /// SQLite's bound-parameter limit however large the feed is.
    pub fn insert_all(&self, posts: &[Post]) -> Result<(), DataError> {
        for chunk in posts.chunks(INSERT_CHUNK) {
            let mut placeholders = Vec::with_capacity(chunk.len());
            let mut params: Vec<Value> = Vec::with_capacity(chunk.len() * 3);
            for (i, post) in chunk.iter().enumerate() {
                let n = i * 3;
                placeholders.push(format!("(?{}, ?{}, ?{})", n + 1, n + 2, n + 3));
                params.push(post.id.as_str().into());
                params.push(post.created_at.as_str().into());
                params.push(serde_json::to_string(post)?.into());
            }

            let sql = format!(
                "INSERT OR REPLACE INTO cached_posts (id, created_at, data) VALUES {}",
                placeholders.join(", ")
            );
            self.db.exec(&sql, &params)?;
        }
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), DataError> {
        self.db.exec("DELETE FROM cached_posts WHERE id = ?1", &[id.into()])?;
        Ok(())
    }

    pub fn delete_all(&self) -> Result<(), DataError> {
        self.db.exec("DELETE FROM cached_posts", &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::local::LocalDb;
    use crate::testing::post;

    #[test]
    fn insert_replaces_by_id() {
        let db = LocalDb::open_in_memory().unwrap();
        db.cached.insert(&post("1", "A")).unwrap();
        db.cached.insert(&post("1", "A2")).unwrap();

        let all = db.cached.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "A2");
        assert_eq!(db.cached.get("1").unwrap().unwrap().title, "A2");
        assert!(db.cached.get("2").unwrap().is_none());
    }

    #[test]
    fn insert_all_and_delete() {
        let db = LocalDb::open_in_memory().unwrap();
        db.cached
            .insert_all(&[post("1", "A"), post("2", "B"), post("3", "C")])
            .unwrap();
        assert_eq!(db.cached.all().unwrap().len(), 3);

        db.cached.delete("2").unwrap();
        let ids: Vec<String> = db.cached.all().unwrap().into_iter().map(|p| p.id).collect();
        assert!(!ids.contains(&"2".to_string()));

        db.cached.delete_all().unwrap();
        assert!(db.cached.all().unwrap().is_empty());
    }

    #[test]
    fn insert_all_splits_large_batches() {
        let db = LocalDb::open_in_memory().unwrap();
        let posts: Vec<_> = (0..11_000).map(|i| post(&i.to_string(), "P")).collect();
        db.cached.insert_all(&posts).unwrap();
        assert_eq!(db.cached.all().unwrap().len(), 11_000);
        assert_eq!(db.cached.get("10999").unwrap().unwrap().id, "10999");
    }

    #[test]
    fn newest_first() {
        let db = LocalDb::open_in_memory().unwrap();
        let mut old = post("old", "Old");
        old.created_at = "2023-01-01T00:00:00Z".into();
        let mut new = post("new", "New");
        new.created_at = "2024-06-01T00:00:00Z".into();
        db.cached.insert_all(&[old, new]).unwrap();

        let ids: Vec<String> = db.cached.all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn watch_all_follows_writes() {
        let db = LocalDb::open_in_memory().unwrap();
        let mut rx = db.cached.watch_all().unwrap();
        assert!(rx.borrow().is_empty());

        db.cached.insert(&post("1", "A")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        db.cached.delete_all().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }
}
