/**
 * Change Broadcasting
 *
 * This module provides the broadcast channel every document store writes its
 * change events into. It uses `tokio::sync::broadcast`, a multi-producer,
 * multi-consumer channel: every open subscription holds its own receiver and
 * sees every event sent after it subscribed.
 */

use crate::shared::ChangeEvent;
use tokio::sync::broadcast;

/// Broadcast sender for document change events
///
/// Cloned into every store; subscriptions call `subscribe()` on it.
pub type ChangeBroadcast = broadcast::Sender<ChangeEvent>;

/// Create a change channel with the given capacity
pub fn change_channel(capacity: usize) -> ChangeBroadcast {
    let (tx, _) = broadcast::channel(capacity.max(1));
    tx
}

/// Broadcast a change to all subscribers
///
/// # Returns
///
/// Number of active receivers that got the event (0 if there are none)
pub fn broadcast_change(broadcast_tx: &ChangeBroadcast, event: ChangeEvent) -> usize {
    let col = event.col;
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] {} change sent to {} subscribers", col, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay
            tracing::trace!("[Realtime] No subscribers for {} change", col);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Document, EntityKind};

    fn event() -> ChangeEvent {
        ChangeEvent::created(EntityKind::Room, Document::new("r1", serde_json::json!({"name": "Lab"})))
    }

    #[tokio::test]
    async fn test_broadcast_change_no_subscribers() {
        let tx = change_channel(16);
        assert_eq!(broadcast_change(&tx, event()), 0);
    }

    #[tokio::test]
    async fn test_broadcast_multiple_subscribers() {
        let tx = change_channel(16);
        let mut sub1 = tx.subscribe();
        let mut sub2 = tx.subscribe();

        assert_eq!(broadcast_change(&tx, event()), 2);
        assert_eq!(sub1.recv().await.unwrap().doc.id, "r1");
        assert_eq!(sub2.recv().await.unwrap().doc.id, "r1");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let tx = change_channel(0);
        let _rx = tx.subscribe();
        assert_eq!(broadcast_change(&tx, event()), 1);
    }
}
