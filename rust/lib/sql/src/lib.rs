pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{written_table, ChangeHandler, ListenerId, Row, SQLStore, Value};
