// ── Cache actions ──
//
// The explicit event type every store write flows through. A loader
// dispatches exactly one Request before its client call and exactly one
// Success or Error after it.

use std::sync::Arc;

use crate::error::CoreError;

use super::key::CacheKey;

/// One step of an entity load's lifecycle.
#[derive(Debug, Clone)]
pub enum EntityAction<T> {
    /// A fetch is starting for this key.
    Request { key: CacheKey },
    /// A fetch finished; `data` becomes the stored payload.
    Success { key: CacheKey, data: Arc<T> },
    /// A fetch failed. Cancellations transition the loading flag only;
    /// every other error is persisted under the full key.
    Error {
        key: CacheKey,
        error: Arc<CoreError>,
    },
}

impl<T> EntityAction<T> {
    pub fn key(&self) -> &CacheKey {
        match self {
            Self::Request { key }
            | Self::Success { key, .. }
            | Self::Error { key, .. } => key,
        }
    }
}
