use std::sync::Arc;

use quill_core::Draft;
use quill_sql::SQLStore;
use tokio::sync::watch;

use super::{decode, decode_all, live_query};
use crate::error::DataError;

const TABLE: &str = "drafts";

fn load_all(db: &dyn SQLStore) -> Result<Vec<Draft>, DataError> {
    let rows = db.query("SELECT data FROM drafts ORDER BY updated_at DESC, id ASC", &[])?;
    decode_all(&rows)
}

#[derive(Clone)]
pub struct DraftStore {
    db: Arc<dyn SQLStore>,
}

impl DraftStore {
    pub(crate) fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    pub fn get(&self, id: &str) -> Result<Option<Draft>, DataError> {
        let rows = self.db.query("SELECT data FROM drafts WHERE id = ?1", &[id.into()])?;
        rows.first().map(decode).transpose()
    }

    /// Drafts, most recently edited first.
    pub fn all(&self) -> Result<Vec<Draft>, DataError> {
        load_all(self.db.as_ref())
    }

    pub fn watch_all(&self) -> Result<watch::Receiver<Vec<Draft>>, DataError> {
        live_query(&self.db, TABLE, load_all)
    }

    pub fn upsert(&self, draft: &Draft) -> Result<(), DataError> {
        self.db.exec(
            "INSERT OR REPLACE INTO drafts (id, updated_at, data) VALUES (?1, ?2, ?3)",
            &[
                draft.id.as_str().into(),
                draft.updated_at.as_str().into(),
                serde_json::to_string(draft)?.into(),
            ],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), DataError> {
        self.db.exec("DELETE FROM drafts WHERE id = ?1", &[id.into()])?;
        Ok(())
    }
}
