/**
 * Subscription Tasks
 *
 * A subscription is a spawned task that listens on the change broadcast,
 * filters events with a `ChangeFilter` and hands matching events to a
 * callback. The task is released through its `Unsubscribe` handle, which
 * aborts it and reports whether it had failed.
 *
 * # Connection Management
 *
 * - Lagged receivers are logged and keep listening
 * - A closed broadcast channel ends the task
 */

use crate::backend::realtime::broadcast::ChangeBroadcast;
use crate::backend::store::{StoreError, StoreResult};
use crate::shared::{ChangeEvent, ChangeFilter};
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Callback receiving every change that passes a subscription's filter
pub type ChangeCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Release handle of one subscription
///
/// Consumed by `call`, so it runs at most once.
pub struct Unsubscribe {
    release: Box<dyn FnOnce() -> BoxFuture<'static, StoreResult<()>> + Send>,
}

impl Unsubscribe {
    pub fn new<F, Fut>(release: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<()>> + Send + 'static,
    {
        Self {
            release: Box::new(move || Box::pin(release())),
        }
    }

    /// Run the release
    pub async fn call(self) -> StoreResult<()> {
        (self.release)().await
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Unsubscribe")
    }
}

/// Start a filtered subscription on the change broadcast
///
/// The receiver is registered before this returns, so every change sent
/// afterwards is seen by the subscription.
pub fn spawn_subscription(
    broadcast_tx: &ChangeBroadcast,
    filter: ChangeFilter,
    callback: ChangeCallback,
) -> Unsubscribe {
    let mut rx = broadcast_tx.subscribe();
    let label = format!("{:?}", filter);

    tracing::debug!("[Realtime] Subscription started: {}", label);

    let task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if filter.matches(&event) {
                        callback(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Subscription lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("[Realtime] Change channel closed, ending subscription");
                    break;
                }
            }
        }
    });

    Unsubscribe::new(move || async move {
        task.abort();
        match task.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => {
                tracing::debug!("[Realtime] Subscription released: {}", label);
                Ok(())
            }
            Err(e) => Err(StoreError::Subscription(format!("{}: {}", label, e))),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::realtime::broadcast::{broadcast_change, change_channel};
    use crate::shared::{Document, EntityKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn room(id: &str) -> ChangeEvent {
        ChangeEvent::created(EntityKind::Room, Document::new(id, serde_json::json!({"name": "Lab"})))
    }

    #[tokio::test]
    async fn test_subscription_filters_and_releases() {
        let tx = change_channel(16);
        let (seen_tx, mut seen_rx) = tokio::sync::mpsc::unbounded_channel();
        let callback: ChangeCallback = Arc::new(move |event: ChangeEvent| {
            let _ = seen_tx.send(event.doc.id);
        });

        let handle = spawn_subscription(&tx, ChangeFilter::One(EntityKind::Room, "r2".into()), callback);
        broadcast_change(&tx, room("r1"));
        broadcast_change(&tx, room("r2"));

        let got = tokio::time::timeout(Duration::from_secs(1), seen_rx.recv()).await.unwrap();
        assert_eq!(got.as_deref(), Some("r2"));

        handle.call().await.unwrap();
        assert_eq!(tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_released_subscription_stops_delivering() {
        let tx = change_channel(16);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handle = spawn_subscription(
            &tx,
            ChangeFilter::All(EntityKind::Room),
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        handle.call().await.unwrap();
        broadcast_change(&tx, room("r1"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
