use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use rusqlite::Connection;
use tracing::debug;

use crate::error::SQLError;
use crate::traits::{written_table, ChangeHandler, ListenerId, Row, SQLStore, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// A single connection serialises all statements. Change listeners run on
/// the writing thread after the connection lock has been released.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    listeners: RwLock<Vec<(ListenerId, ChangeHandler)>>,
    next_listener: AtomicU64,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SQLError::Connection(e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL keeps readers unblocked while a sync rewrites the cache.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        debug!(path = %path.display(), "opened sqlite store");
        Ok(Self::from_connection(conn))
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    fn notify(&self, table: &str) {
        // Clone out so handlers may register, remove or write without deadlocking.
        let handlers: Vec<(ListenerId, ChangeHandler)> = match self.listeners.read() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };

        let mut finished = Vec::new();
        for (id, handler) in handlers {
            if !handler(self, table) {
                finished.push(id);
            }
        }
        for id in finished {
            self.remove_listener(id);
        }
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), row_value_at(row, i)?));
                }
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| SQLError::Query(e.to_string()))
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let affected = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| SQLError::Execution(e.to_string()))?;

            let bound = bind_params(params);
            let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                bound.iter().map(|b| b.as_ref()).collect();

            conn.execute(sql, param_refs.as_slice())
                .map_err(|e| SQLError::Execution(e.to_string()))?
        };

        if let Some(table) = written_table(sql) {
            self.notify(&table);
        }
        Ok(affected as u64)
    }

    fn exec_batch(&self, sql: &str) -> Result<(), SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        conn.execute_batch(sql)
            .map_err(|e| SQLError::Execution(e.to_string()))
    }

    fn on_change(&self, handler: ChangeHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push((id, handler));
        }
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.retain(|(lid, _)| *lid != id);
        }
    }
}

/// Extract a Value from a rusqlite row using the column's declared storage class.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    use rusqlite::types::ValueRef;

    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec_batch("CREATE TABLE notes (id TEXT PRIMARY KEY, body TEXT, n INTEGER);")
            .unwrap();
        store
    }

    #[test]
    fn exec_and_query() {
        let store = store();
        let affected = store
            .exec(
                "INSERT INTO notes (id, body, n) VALUES (?1, ?2, ?3)",
                &["a".into(), Value::Null, 5i64.into()],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = store
            .query("SELECT id, body, n FROM notes WHERE id = ?1", &["a".into()])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("id"), Some("a"));
        assert_eq!(rows[0].get("body"), Some(&Value::Null));
        assert_eq!(rows[0].get_i64("n"), Some(5));
    }

    #[test]
    fn numeric_text_stays_text() {
        let store = store();
        store
            .exec("INSERT INTO notes (id, body) VALUES (?1, ?2)", &["1".into(), "42".into()])
            .unwrap();
        let rows = store.query("SELECT id, body FROM notes", &[]).unwrap();
        assert_eq!(rows[0].get_str("id"), Some("1"));
        assert_eq!(rows[0].get_str("body"), Some("42"));
    }

    #[test]
    fn bad_sql_is_an_error() {
        let store = store();
        assert!(matches!(
            store.query("SELECT nope FROM missing", &[]),
            Err(SQLError::Query(_))
        ));
        assert!(matches!(
            store.exec("INSERT INTO missing VALUES (1)", &[]),
            Err(SQLError::Execution(_))
        ));
    }

    #[test]
    fn listeners_see_written_table() {
        let store = store();
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_c = seen.clone();
        store.on_change(Arc::new(move |_: &dyn SQLStore, table: &str| {
            seen_c.lock().unwrap().push(table.to_string());
            true
        }));

        store
            .exec("INSERT INTO notes (id) VALUES (?1)", &["a".into()])
            .unwrap();
        store.query("SELECT * FROM notes", &[]).unwrap();
        store.exec("DELETE FROM notes", &[]).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["notes", "notes"]);
    }

    #[test]
    fn listener_can_requery_inside_handler() {
        let store = store();
        let counts = Arc::new(Mutex::new(Vec::<usize>::new()));
        let counts_c = counts.clone();
        store.on_change(Arc::new(move |db: &dyn SQLStore, _: &str| {
            let rows = db.query("SELECT id FROM notes", &[]).unwrap();
            counts_c.lock().unwrap().push(rows.len());
            true
        }));

        store.exec("INSERT INTO notes (id) VALUES ('a')", &[]).unwrap();
        store.exec("INSERT INTO notes (id) VALUES ('b')", &[]).unwrap();
        assert_eq!(*counts.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn returning_false_unregisters() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_c = calls.clone();
        store.on_change(Arc::new(move |_: &dyn SQLStore, _: &str| {
            calls_c.fetch_add(1, Ordering::SeqCst);
            false
        }));

        store.exec("INSERT INTO notes (id) VALUES ('a')", &[]).unwrap();
        store.exec("INSERT INTO notes (id) VALUES ('b')", &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_listener_stops_notifications() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_c = calls.clone();
        let id = store.on_change(Arc::new(move |_: &dyn SQLStore, _: &str| {
            calls_c.fetch_add(1, Ordering::SeqCst);
            true
        }));

        store.exec("INSERT INTO notes (id) VALUES ('a')", &[]).unwrap();
        store.remove_listener(id);
        store.exec("INSERT INTO notes (id) VALUES ('b')", &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn open_on_disk_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.sqlite");
        let store = SqliteStore::open(&path).unwrap();
        store.exec_batch("CREATE TABLE t (id TEXT);").unwrap();
        assert!(path.exists());
    }
}
