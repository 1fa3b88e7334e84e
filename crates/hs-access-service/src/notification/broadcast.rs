//! In-process notifiers.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use hs_access_core::events::DomainEvent;
use hs_access_core::result::AppResult;
use hs_access_core::traits::PermissionNotifier;

/// Fans events out to every subscriber over a Tokio broadcast channel.
///
/// Slow subscribers that fall more than `buffer_size` events behind miss
/// the oldest events and observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastNotifier {
    /// Create a notifier buffering up to `buffer_size` events per subscriber.
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl PermissionNotifier for BroadcastNotifier {
    async fn notify(&self, events: &[DomainEvent]) -> AppResult<()> {
        for event in events {
            // No subscribers is not an error.
            if self.sender.send(event.clone()).is_err() {
                trace!(event_id = %event.id, "No subscribers for access event");
            }
        }
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl PermissionNotifier for NoopNotifier {
    async fn notify(&self, _events: &[DomainEvent]) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_access_core::events::{EventPayload, PermissionEvent};
    use hs_access_core::types::ResourceId;

    fn purge_event() -> DomainEvent {
        DomainEvent::new(
            None,
            EventPayload::Permission(PermissionEvent::ResourcePurged {
                resource: ResourceId::new(),
            }),
        )
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let notifier = BroadcastNotifier::new(8);
        let mut rx = notifier.subscribe();
        let event = purge_event();
        notifier
            .notify(std::slice::from_ref(&event))
            .await
            .expect("notify");
        let received = rx.recv().await.expect("event");
        assert_eq!(received.id, event.id);
    }

    #[tokio::test]
    async fn test_notify_without_subscribers_is_ok() {
        let notifier = BroadcastNotifier::new(8);
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.notify(&[purge_event()]).await.expect("notify");
        NoopNotifier.notify(&[purge_event()]).await.expect("noop");
    }
}
