use std::collections::HashSet;
use std::sync::Arc;

use quill_sql::SQLStore;

use crate::error::DataError;

/// Local mirror of the likes the signed-in user made from this device.
#[derive(Clone)]
pub struct LikeStore {
    db: Arc<dyn SQLStore>,
}

impl LikeStore {
    pub(crate) fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    pub fn insert(&self, user_id: &str, post_id: &str) -> Result<(), DataError> {
        self.db.exec(
            "INSERT OR REPLACE INTO likes (user_id, post_id) VALUES (?1, ?2)",
            &[user_id.into(), post_id.into()],
        )?;
        Ok(())
    }

    pub fn delete(&self, user_id: &str, post_id: &str) -> Result<(), DataError> {
        self.db.exec(
            "DELETE FROM likes WHERE user_id = ?1 AND post_id = ?2",
            &[user_id.into(), post_id.into()],
        )?;
        Ok(())
    }

    pub fn is_liked(&self, user_id: &str, post_id: &str) -> Result<bool, DataError> {
        let rows = self.db.query(
            "SELECT post_id FROM likes WHERE user_id = ?1 AND post_id = ?2",
            &[user_id.into(), post_id.into()],
        )?;
        Ok(!rows.is_empty())
    }

    pub fn liked_post_ids(&self, user_id: &str) -> Result<HashSet<String>, DataError> {
        let rows = self
            .db
            .query("SELECT post_id FROM likes WHERE user_id = ?1", &[user_id.into()])?;
        rows.iter()
            .map(|r| -> Result<String, DataError> { Ok(r.text("post_id")?.to_string()) })
            .collect()
    }

    pub fn clear(&self) -> Result<(), DataError> {
        self.db.exec("DELETE FROM likes", &[])?;
        Ok(())
    }
}
