use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased, reference-counted state value. Clone is an Arc bump.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow as `T`, or `None` if the stored type differs.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Owned copy of the stored `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateValue")
            .field("type_id", &(*self.inner).type_id())
            .finish()
    }
}

/// Handle returned by `StateStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_matches_stored_type_only() {
        let v = StateValue::new(42u32);
        assert_eq!(v.downcast_ref::<u32>(), Some(&42));
        assert_eq!(v.downcast_ref::<i32>(), None);
        assert!(v.is::<u32>());
        assert!(!v.is::<String>());
    }

    #[test]
    fn cloned_copies_out() {
        #[derive(Debug, Clone, PartialEq)]
        struct FeedState {
            count: usize,
        }
        let v = StateValue::new(FeedState { count: 3 });
        assert_eq!(v.cloned::<FeedState>(), Some(FeedState { count: 3 }));
        assert_eq!(v.cloned::<String>(), None);
    }

    #[test]
    fn clone_shares_data() {
        let v1 = StateValue::new(vec![0u8; 1024]);
        let v2 = v1.clone();
        let p1 = v1.downcast_ref::<Vec<u8>>().unwrap().as_ptr();
        let p2 = v2.downcast_ref::<Vec<u8>>().unwrap().as_ptr();
        assert_eq!(p1, p2);
    }

    fn _assert_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<StateValue>();
        assert_sync::<StateValue>();
    }
}
