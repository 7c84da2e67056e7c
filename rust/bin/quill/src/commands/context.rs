//! Wires the config, session, cache and API client into an app.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use quill_app::request::InitializeReq;
use quill_app::{QuillApp, QuillContext};
use quill_client::{ApiClient, SessionToken};
use quill_core::ClientConfig;
use quill_data::{LocalDb, Session};
use quill_kv::{KVStore, RedbStore};
use tracing::debug;

/// Open the local stores under the configured data dir and start an app
/// with the persisted session restored.
pub async fn open(config: &ClientConfig) -> Result<QuillApp> {
    let data_dir = config.resolve_data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let token = Arc::new(SessionToken::new());
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&config.resolve_session_path())?);
    let session = Arc::new(Session::load(kv, token.clone())?);

    let client = ApiClient::new(
        config.server.clone(),
        token,
        Duration::from_secs(config.timeout_secs),
    )?;
    let local = LocalDb::open(&config.resolve_cache_path())?;
    debug!(server = %config.server, data_dir = %data_dir.display(), "stores opened");

    let ctx = QuillContext::new(Arc::new(client), local, session, config.page_size);
    let app = QuillApp::new(ctx);
    app.send(InitializeReq).await;
    Ok(app)
}
