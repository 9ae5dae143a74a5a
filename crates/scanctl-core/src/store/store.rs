// ── Reactive entity store ──
//
// Wraps the cache state in a `watch` channel: dispatches fold the state
// inside the channel's write lock (single-writer discipline), snapshots
// are cheap `Arc` clones, and subscribers get push-based change
// notification.

use std::sync::Arc;

use tokio::sync::watch;

use super::actions::EntityAction;
use super::key::CacheKey;
use super::state::EntityState;
use super::stream::StateStream;

/// A reactive cache store for a single entity type.
pub struct EntityStore<T> {
    state: watch::Sender<Arc<EntityState<T>>>,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(EntityState::new()));
        Self { state }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn state(&self) -> Arc<EntityState<T>> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EntityState<T>>> {
        self.state.subscribe()
    }

    /// Subscribe as a [`StateStream`].
    pub fn watch(&self) -> StateStream<T> {
        StateStream::new(self.state.subscribe())
    }

    /// Fold one action into the state and notify subscribers.
    pub fn dispatch(&self, action: EntityAction<T>) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state
            .send_modify(|state| Arc::make_mut(state).apply(&action));
    }

    /// Atomically begin a load: when no fetch is in flight for the key's
    /// full serialization (or `force` is set), dispatch the Request
    /// action and return `true`. Otherwise leave the state untouched and
    /// return `false`.
    ///
    /// Check and dispatch happen inside the channel's write lock, so "at
    /// most one in-flight fetch per key" holds under true parallelism.
    pub fn try_begin(&self, key: &CacheKey, force: bool) -> bool {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if !force && state.loading_flag(&key.loading()) == Some(true) {
                return false;
            }
            Arc::make_mut(state).apply(&EntityAction::Request { key: key.clone() });
            started = true;
            true
        });
        started
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn dispatch_is_visible_in_snapshots() {
        let store: EntityStore<String> = EntityStore::new();
        let before = store.state();

        store.dispatch(EntityAction::Success {
            key: CacheKey::entity("a1", None),
            data: Arc::new("payload".to_owned()),
        });

        // Old snapshot is untouched; new snapshot sees the write.
        assert!(before.entity("a1", None).is_none());
        assert_eq!(store.state().entity("a1", None).unwrap().as_str(), "payload");
    }

    #[test]
    fn try_begin_guards_duplicate_loads() {
        let store: EntityStore<String> = EntityStore::new();
        let key = CacheKey::entity("a1", None);

        assert!(store.try_begin(&key, false));
        assert!(!store.try_begin(&key, false));
        assert_eq!(store.state().is_loading("a1", None), Some(true));
    }

    #[test]
    fn force_bypasses_the_guard() {
        let store: EntityStore<String> = EntityStore::new();
        let key = CacheKey::entity("a1", None);

        assert!(store.try_begin(&key, false));
        assert!(store.try_begin(&key, true));
    }

    #[test]
    fn guard_reopens_after_completion() {
        let store: EntityStore<String> = EntityStore::new();
        let key = CacheKey::entity("a1", None);

        assert!(store.try_begin(&key, false));
        store.dispatch(EntityAction::Error {
            key: key.clone(),
            error: Arc::new(CoreError::Cancelled),
        });
        assert!(store.try_begin(&key, false));
    }

    #[test]
    fn subscribers_see_changes() {
        let store: EntityStore<String> = EntityStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatch(EntityAction::Request {
            key: CacheKey::entity("a1", None),
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().is_loading("a1", None),
            Some(true)
        );
    }
}
