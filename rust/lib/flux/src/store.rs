use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::pattern;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    pattern: String,
    handler: ChangeHandler,
}

/// Per-path state store with pattern-matched change notification.
///
/// Subscribers run synchronously on the thread calling `set`, after the
/// value is visible to `get`. No store lock is held while they run, so a
/// subscriber may read or write the store.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

// Poisoning only means a subscriber panicked; the map itself is intact.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscriptions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at the given path and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        write(&self.values).insert(path.to_string(), value.clone());
        self.notify(path, &value);
    }

    fn notify(&self, path: &str, value: &StateValue) {
        let handlers: Vec<ChangeHandler> = read(&self.subscriptions)
            .iter()
            .filter(|s| pattern::matches(&s.pattern, path))
            .map(|s| s.handler.clone())
            .collect();
        for handler in handlers {
            handler(path, value);
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        read(&self.values).get(path).cloned()
    }

    /// Typed read: `None` if unset or of another type.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned::<T>())
    }

    /// Read-modify-write of a typed value, atomic with respect to other
    /// writers. Starts from `T::default()` when the path is unset. `f` runs
    /// under the store lock and must not touch the store.
    pub fn update<T, F>(&self, path: &str, f: F)
    where
        T: Any + Clone + Default + Send + Sync,
        F: FnOnce(&mut T),
    {
        let value = {
            let mut values = write(&self.values);
            let mut current = values
                .get(path)
                .and_then(|v| v.cloned::<T>())
                .unwrap_or_default();
            f(&mut current);
            let value = StateValue::new(current);
            values.insert(path.to_string(), value.clone());
            value
        };
        self.notify(path, &value);
    }

    /// Remove the value at a path. Does not notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        write(&self.values).remove(path)
    }

    /// Remove `prefix` itself and everything below `prefix/`.
    pub fn remove_tree(&self, prefix: &str) {
        let child = format!("{}/", prefix);
        write(&self.values).retain(|k, _| k != prefix && !k.starts_with(&child));
    }

    /// Entries strictly below `{prefix}/`, ordered by path.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let scan_prefix = format!("{}/", prefix);
        read(&self.values)
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        read(&self.values).contains_key(path)
    }

    pub fn len(&self) -> usize {
        read(&self.values).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn paths(&self) -> Vec<String> {
        read(&self.values).keys().cloned().collect()
    }

    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        write(&self.subscriptions).push(Subscription {
            id,
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        write(&self.subscriptions).retain(|s| s.id != id);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
