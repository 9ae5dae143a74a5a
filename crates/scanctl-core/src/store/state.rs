// ── Cache state: the pure fold target ──
//
// Three maps per entity type, never mutated outside `apply`. Selector
// methods re-derive the same keys as the fold, so reads and writes agree.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CoreError;
use crate::model::Filter;

use super::actions::EntityAction;
use super::key::{
    collection_identifier, delta_identifier, entity_identifier, simplified_collection_identifier,
    simplified_entity_identifier,
};

/// Cached state for one entity type.
///
/// `is_loading` and `errors` key by the full serialization; `by_id` keys
/// by the simplified one. Entries are never evicted — they live as long
/// as the store.
#[derive(Debug, Default)]
pub struct EntityState<T> {
    by_id: HashMap<String, Arc<T>>,
    is_loading: HashMap<String, bool>,
    errors: HashMap<String, Arc<CoreError>>,
}

// Manual impl: `Arc<T>` clones regardless of `T`, the derive would
// over-constrain.
impl<T> Clone for EntityState<T> {
    fn clone(&self) -> Self {
        Self {
            by_id: self.by_id.clone(),
            is_loading: self.is_loading.clone(),
            errors: self.errors.clone(),
        }
    }
}

impl<T> EntityState<T> {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            is_loading: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    // ── The fold ─────────────────────────────────────────────────────

    /// Apply one action. The only mutation path into the cache maps.
    pub(crate) fn apply(&mut self, action: &EntityAction<T>) {
        match action {
            EntityAction::Request { key } => {
                self.is_loading.insert(key.loading(), true);
            }
            EntityAction::Success { key, data } => {
                self.is_loading.insert(key.loading(), false);
                self.errors.remove(&key.loading());
                self.by_id.insert(key.storage(), Arc::clone(data));
            }
            EntityAction::Error { key, error } => {
                self.is_loading.insert(key.loading(), false);
                if !error.is_cancellation() {
                    self.errors.insert(key.loading(), Arc::clone(error));
                }
            }
        }
    }

    // ── Raw keyed access (used by the store's in-flight guard) ───────

    pub(crate) fn loading_flag(&self, full_key: &str) -> Option<bool> {
        self.is_loading.get(full_key).copied()
    }

    // ── Entity selectors ─────────────────────────────────────────────

    /// In-flight flag for an entity key; `None` if the key was never
    /// touched.
    pub fn is_loading(&self, id: &str, filter: Option<&Filter>) -> Option<bool> {
        self.loading_flag(&entity_identifier(id, filter))
    }

    /// Last persisted error for an entity key.
    pub fn error(&self, id: &str, filter: Option<&Filter>) -> Option<Arc<CoreError>> {
        self.errors.get(&entity_identifier(id, filter)).cloned()
    }

    /// Last stored payload, read through the simplified key so a fetch
    /// with different pagination/sort hits the same payload.
    pub fn entity(&self, id: &str, filter: Option<&Filter>) -> Option<Arc<T>> {
        self.by_id
            .get(&simplified_entity_identifier(id, filter))
            .cloned()
    }

    // ── Delta-pair selectors ─────────────────────────────────────────

    pub fn is_loading_delta(&self, id: &str, delta_id: &str) -> Option<bool> {
        self.loading_flag(&delta_identifier(id, delta_id))
    }

    pub fn delta_error(&self, id: &str, delta_id: &str) -> Option<Arc<CoreError>> {
        self.errors.get(&delta_identifier(id, delta_id)).cloned()
    }

    pub fn delta(&self, id: &str, delta_id: &str) -> Option<Arc<T>> {
        self.by_id.get(&delta_identifier(id, delta_id)).cloned()
    }

    // ── Collection selectors ─────────────────────────────────────────

    pub fn is_loading_collection(&self, filter: Option<&Filter>) -> Option<bool> {
        self.loading_flag(&collection_identifier(filter))
    }

    pub fn collection_error(&self, filter: Option<&Filter>) -> Option<Arc<CoreError>> {
        self.errors.get(&collection_identifier(filter)).cloned()
    }

    pub fn collection(&self, filter: Option<&Filter>) -> Option<Arc<T>> {
        self.by_id
            .get(&simplified_collection_identifier(filter))
            .cloned()
    }
}
