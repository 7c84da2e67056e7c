use quill_kv::KVError;
use quill_sql::SQLError;

/// Local failures of the data layer. Remote failures are reported through
/// `NetworkResult` instead.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("sql: {0}")]
    Sql(#[from] SQLError),

    #[error("kv: {0}")]
    Kv(#[from] KVError),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("not found: {0}")]
    NotFound(String),
}
