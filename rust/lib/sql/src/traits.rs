use std::sync::Arc;

use crate::error::SQLError;

/// A dynamically-typed SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A row returned from a SQL query: column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a text column value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer column value by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Like `get_str`, but a missing or non-text column is an error.
    pub fn text(&self, name: &str) -> Result<&str, SQLError> {
        self.get_str(name).ok_or_else(|| SQLError::Column {
            column: name.to_string(),
            reason: "missing or not text".to_string(),
        })
    }
}

/// Identifies a change listener registered with `SQLStore::on_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Called after a write statement touched `table`.
///
/// The store passes itself so the handler can re-query without holding a
/// reference back to the store. Returning `false` unregisters the handler.
pub type ChangeHandler = Arc<dyn Fn(&dyn SQLStore, &str) -> bool + Send + Sync>;

/// SQLStore provides a SQL execution interface backed by an embedded database,
/// with table-level change notification for live queries.
pub trait SQLStore: Send + Sync {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError>;

    /// Execute a statement (INSERT/UPDATE/DELETE) and return affected row count.
    ///
    /// Listeners are notified after the statement completes, whether or not
    /// any rows were affected.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError>;

    /// Execute several `;`-separated statements without parameters (schema setup).
    /// Does not notify listeners.
    fn exec_batch(&self, sql: &str) -> Result<(), SQLError>;

    /// Register a handler invoked after every write to any table.
    fn on_change(&self, handler: ChangeHandler) -> ListenerId;

    /// Remove a previously registered handler.
    fn remove_listener(&self, id: ListenerId);
}

/// Name of the table a write statement targets, lower-cased.
///
/// Understands `INSERT [OR x] INTO t`, `REPLACE INTO t`, `UPDATE [OR x] t`
/// and `DELETE FROM t`. Returns `None` for anything else.
pub fn written_table(sql: &str) -> Option<String> {
    let tokens: Vec<String> = sql
        .split(|c: char| c.is_whitespace() || c == '(')
        .filter(|t| !t.is_empty())
        .take(6)
        .map(|t| t.to_ascii_lowercase())
        .collect();

    let mut iter = tokens.iter().map(String::as_str);
    let table = match iter.next()? {
        "insert" | "replace" => {
            // Skip to the token after INTO.
            iter.find(|t| *t == "into")?;
            iter.next()?
        }
        "update" => {
            let next = iter.next()?;
            if next == "or" {
                iter.next()?;
                iter.next()?
            } else {
                next
            }
        }
        "delete" => {
            if iter.next()? != "from" {
                return None;
            }
            iter.next()?
        }
        _ => return None,
    };

    Some(table.trim_matches(|c: char| c == '"' || c == '`' || c == ';').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_table_recognises_write_statements() {
        assert_eq!(written_table("INSERT INTO posts (id) VALUES (?1)").as_deref(), Some("posts"));
        assert_eq!(
            written_table("INSERT OR REPLACE INTO cached_posts(id, data) VALUES (?1, ?2)").as_deref(),
            Some("cached_posts")
        );
        assert_eq!(written_table("replace into Likes values (1)").as_deref(), Some("likes"));
        assert_eq!(written_table("UPDATE drafts SET title = ?1").as_deref(), Some("drafts"));
        assert_eq!(written_table("UPDATE OR IGNORE drafts SET x = 1").as_deref(), Some("drafts"));
        assert_eq!(written_table("DELETE FROM saved_posts;").as_deref(), Some("saved_posts"));
        assert_eq!(written_table("  delete from \"likes\" where 1").as_deref(), Some("likes"));
    }

    #[test]
    fn written_table_ignores_reads_and_ddl() {
        assert_eq!(written_table("SELECT * FROM posts"), None);
        assert_eq!(written_table("CREATE TABLE posts (id TEXT)"), None);
        assert_eq!(written_table("DELETE posts"), None);
        assert_eq!(written_table(""), None);
    }

    #[test]
    fn row_accessors() {
        let row = Row {
            columns: vec![
                ("id".into(), Value::Text("1".into())),
                ("n".into(), Value::Integer(7)),
                ("gone".into(), Value::Null),
            ],
        };
        assert_eq!(row.get_str("id"), Some("1"));
        assert_eq!(row.get_i64("n"), Some(7));
        assert_eq!(row.get_str("n"), None);
        assert!(row.text("id").is_ok());
        assert!(matches!(row.text("gone"), Err(SQLError::Column { .. })));
    }

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(3i64), Value::Integer(3));
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x".to_string())), Value::Text("x".into()));
    }
}
