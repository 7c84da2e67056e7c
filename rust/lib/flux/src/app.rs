use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use crate::router::Router;
use crate::store::StateStore;
use crate::value::{StateValue, SubscriptionId};

/// The state engine: one store plus one request router.
///
/// ```ignore
/// let flux = Flux::new();
/// flux.on("feed/load", |_, _, store| async move {
///     store.set("feed/state", FeedState::loading());
/// });
/// flux.subscribe("feed/#", |path, _| println!("{path} changed"));
/// flux.emit("feed/load", ()).await;
/// ```
pub struct Flux {
    store: Arc<StateStore>,
    router: Router,
}

impl Flux {
    pub fn new() -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            router: Router::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.store.get(path)
    }

    /// Typed read of the state at `path`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.store.get_as(path)
    }

    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        self.store.scan(prefix)
    }

    /// Emit a request and wait for every matching handler to finish.
    /// No matching handler is a silent no-op.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) {
        self.router
            .dispatch(path, Arc::new(payload), Arc::clone(&self.store))
            .await;
    }

    pub async fn emit_arc(&self, path: &str, payload: Arc<dyn Any + Send + Sync>) {
        self.router
            .dispatch(path, payload, Arc::clone(&self.store))
            .await;
    }

    /// Register an async request handler for a path pattern.
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.router.on(pattern, handler);
    }

    pub fn has_handler(&self, path: &str) -> bool {
        self.router.matches(path)
    }

    /// Observe state changes. The handler runs on the thread calling `set`.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        self.store.subscribe(pattern, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.store.unsubscribe(id);
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

impl Default for Flux {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Phase {
        Idle,
        Loading,
        Done(u32),
    }

    #[tokio::test]
    async fn emit_routes_typed_payload_and_sets_state() {
        let flux = Flux::new();
        flux.on("counter/add", |_, payload, store: Arc<StateStore>| async move {
            let n = payload.downcast_ref::<u32>().copied().unwrap_or(0);
            store.update::<u32, _>("counter/value", |v| *v += n);
        });

        flux.emit("counter/add", 2u32).await;
        flux.emit("counter/add", 3u32).await;
        assert_eq!(flux.get_as::<u32>("counter/value"), Some(5));
    }

    #[tokio::test]
    async fn emit_without_handler_is_silent() {
        let flux = Flux::new();
        flux.emit("nobody/listens", ()).await;
        assert!(flux.get("nobody/listens").is_none());
    }

    #[tokio::test]
    async fn subscribers_see_every_transition() {
        let flux = Flux::new();
        let timeline = Arc::new(Mutex::new(Vec::<Phase>::new()));
        let t = timeline.clone();
        flux.subscribe("job/state", move |_, v| {
            if let Some(p) = v.cloned::<Phase>() {
                t.lock().unwrap().push(p);
            }
        });

        flux.on("job/run", |_, _, store: Arc<StateStore>| async move {
            store.set("job/state", Phase::Loading);
            tokio::task::yield_now().await;
            store.set("job/state", Phase::Done(7));
        });

        flux.store().set("job/state", Phase::Idle);
        flux.emit("job/run", ()).await;

        assert_eq!(
            *timeline.lock().unwrap(),
            vec![Phase::Idle, Phase::Loading, Phase::Done(7)]
        );
    }

    #[tokio::test]
    async fn emit_arc_passes_shared_payload() {
        let flux = Flux::new();
        flux.on("echo", |path, payload, store: Arc<StateStore>| async move {
            if let Some(s) = payload.downcast_ref::<String>() {
                store.set(&format!("{}/last", path), s.clone());
            }
        });

        let payload: Arc<dyn Any + Send + Sync> = Arc::new("hi".to_string());
        flux.emit_arc("echo", payload).await;
        assert_eq!(flux.get_as::<String>("echo/last"), Some("hi".to_string()));
        assert!(flux.has_handler("echo"));
        assert_eq!(flux.scan("echo").len(), 1);
    }

    fn _assert_flux_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Flux>();
        assert_sync::<Flux>();
    }
}
