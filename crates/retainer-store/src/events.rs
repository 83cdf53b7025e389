//! Broker notifications for retained updates.
//!
//! The gateway reports every successful retained write to an [`EventSink`].
//! Emission is fire-and-forget: sinks never block the writer and never
//! report delivery failures back to it.
//!
//! ```text
//! Gateway write → EventSink::emit(event) → [Subscriber 1, Subscriber 2, ...]
//! ```

use bytes::Bytes;
use tokio::sync::broadcast;

/// Default channel capacity for retained events.
///
/// A subscriber lagging by more than this many events loses the oldest ones.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// A retained record was updated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetainedEvent {
    /// Topic that was written
    pub topic: String,
    /// New retained payload
    pub payload: Bytes,
}

impl RetainedEvent {
    /// Create a new event
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Observer of retained updates
pub trait EventSink: Send + Sync {
    /// Notify observers that a retained record was updated
    fn emit(&self, event: RetainedEvent);
}

/// Event sink that fans events out over a tokio broadcast channel
#[derive(Clone, Debug)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<RetainedEvent>,
}

impl BroadcastEventSink {
    /// Create a sink with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to future retained updates
    pub fn subscribe(&self) -> broadcast::Receiver<RetainedEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: RetainedEvent) {
        // No subscribers is fine.
        if self.sender.send(event).is_err() {
            tracing::trace!("retained event dropped, no subscribers");
        }
    }
}

/// Event sink that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: RetainedEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscribers() {
        let sink = BroadcastEventSink::new(8);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();
        assert_eq!(sink.subscriber_count(), 2);

        sink.emit(RetainedEvent::new("hello", "hello world"));

        let expected = RetainedEvent::new("hello", "hello world");
        assert_eq!(first.recv().await.unwrap(), expected);
        assert_eq!(second.recv().await.unwrap(), expected);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let sink = BroadcastEventSink::default();
        sink.emit(RetainedEvent::new("t", "x"));
        assert_eq!(sink.subscriber_count(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let sink = BroadcastEventSink::new(0);
        let mut rx = sink.subscribe();
        sink.emit(RetainedEvent::new("t", "x"));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_noop_sink() {
        NoopEventSink.emit(RetainedEvent::new("t", "x"));
    }
}
