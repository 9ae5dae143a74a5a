// ── Reactive state streams ──
//
// Subscription adapter for consuming cache snapshots as a `Stream`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::state::EntityState;

/// A subscription to one entity store's state.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed`](Self::changed) or by converting into a
/// `Stream`.
pub struct StateStream<T> {
    current: Arc<EntityState<T>>,
    receiver: watch::Receiver<Arc<EntityState<T>>>,
}

impl<T> StateStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<EntityState<T>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or last `changed()`) time.
    pub fn current(&self) -> &Arc<EntityState<T>> {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<EntityState<T>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<EntityState<T>>> {
        self.receiver.changed().await.ok()?;
        let snapshot = self.receiver.borrow_and_update().clone();
        self.current = snapshot.clone();
        Some(snapshot)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StateWatchStream<T>
    where
        T: Send + Sync + 'static,
    {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the underlying store is mutated.
pub struct StateWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Arc<EntityState<T>>>,
}

impl<T: Send + Sync + 'static> Stream for StateWatchStream<T> {
    type Item = Arc<EntityState<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // `Arc<EntityState<T>>` is always Unpin, so the projection is
        // plain.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
