use std::sync::Arc;

use quill_sql::SQLStore;
use tokio::sync::watch;
use tracing::warn;

use crate::error::DataError;

/// Run `load` now and again after every write to `table`, publishing each
/// result on a watch channel.
///
/// The listener unregisters itself on the first change after all
/// receivers are gone. A failed reload keeps the previous value.
pub fn live_query<T, F>(
    db: &Arc<dyn SQLStore>,
    table: &'static str,
    load: F,
) -> Result<watch::Receiver<T>, DataError>
where
    T: Send + Sync + 'static,
    F: Fn(&dyn SQLStore) -> Result<T, DataError> + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(load(db.as_ref())?);

    db.on_change(Arc::new(move |store: &dyn SQLStore, changed: &str| {
        if tx.is_closed() {
            return false;
        }
        if changed == table {
            match load(store) {
                Ok(value) => {
                    tx.send_replace(value);
                }
                Err(e) => warn!(table, error = %e, "live query refresh failed"),
            }
        }
        true
    }));

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_sql::{SqliteStore, Value};

    fn db() -> Arc<dyn SQLStore> {
        let db = SqliteStore::open_in_memory().unwrap();
        db.exec_batch("CREATE TABLE a (id TEXT); CREATE TABLE b (id TEXT);").unwrap();
        Arc::new(db)
    }

    fn count(db: &dyn SQLStore, table: &str) -> Result<usize, DataError> {
        Ok(db.query(&format!("SELECT id FROM {}", table), &[])?.len())
    }

    #[tokio::test]
    async fn reemits_after_write_to_same_table_only() {
        let db = db();
        let mut rx = live_query(&db, "a", |db| count(db, "a")).unwrap();
        assert_eq!(*rx.borrow(), 0);

        db.exec("INSERT INTO b (id) VALUES (?1)", &[Value::from("x")]).unwrap();
        assert!(!rx.has_changed().unwrap());

        db.exec("INSERT INTO a (id) VALUES (?1)", &[Value::from("x")]).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[tokio::test]
    async fn listener_goes_away_with_receivers() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let db = db();
        let loads = Arc::new(AtomicUsize::new(0));
        let l = loads.clone();
        let rx = live_query(&db, "a", move |db| {
            l.fetch_add(1, Ordering::SeqCst);
            count(db, "a")
        })
        .unwrap();
        drop(rx);

        db.exec("INSERT INTO a (id) VALUES ('1')", &[]).unwrap();
        db.exec("INSERT INTO a (id) VALUES ('2')", &[]).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
