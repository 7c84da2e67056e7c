use std::any::Any;
use std::sync::Arc;

use quill_flux::Flux;
use tracing::debug;

use crate::handlers::{register_handlers, QuillContext};
use crate::request::Request;

/// One signed-in (or anonymous) app session: a Flux instance with every
/// handler registered.
///
/// ```ignore
/// let app = QuillApp::new(ctx);
/// app.send(OpenFeedReq).await;
/// let feed = app.get::<FeedState>(FeedState::PATH);
/// app.close();
/// ```
pub struct QuillApp {
    flux: Flux,
    ctx: Arc<QuillContext>,
}

impl QuillApp {
    pub fn new(ctx: QuillContext) -> Self {
        let flux = Flux::new();
        let ctx = Arc::new(ctx);
        register_handlers(&flux, ctx.clone());
        Self { flux, ctx }
    }

    pub fn flux(&self) -> &Flux {
        &self.flux
    }

    pub fn context(&self) -> &Arc<QuillContext> {
        &self.ctx
    }

    /// Emit a request on its path and wait for the handler.
    pub async fn send<R: Request>(&self, req: R) {
        self.flux.emit(R::PATH, req).await;
    }

    pub fn get<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.flux.get_as(path)
    }

    /// Stop live subscriptions and abort background work. State already
    /// written stays readable.
    pub fn close(&self) {
        debug!("closing app");
        self.ctx.scope.close();
    }

    pub fn is_closed(&self) -> bool {
        self.ctx.scope.is_closed()
    }
}

impl Drop for QuillApp {
    fn drop(&mut self) {
        self.close();
    }
}
