//! # Non-blocking event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] distributes events to subscribers concurrently without
//! ever blocking the publisher.
//!
//! ```text
//! emit(event)
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - `emit` uses `try_send`; a full queue drops the event for that subscriber
//!   only and publishes `SubscriberOverflow`.
//! - Worker panics are isolated with `catch_unwind` and reported as
//!   `SubscriberPanicked`; the worker keeps processing.
//! - Overflow/panic diagnostics never generate further diagnostics, so a
//!   saturated queue cannot start an event storm.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct Channel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator: one bounded queue and one worker task per subscriber.
pub struct SubscriberSet {
    channels: Vec<Channel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            let worker_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        worker_bus.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });

            channels.push(Channel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all subscribers. Returns immediately.
    pub fn emit(&self, event: Event) {
        let diagnostic = event.is_subscriber_diagnostic();
        let event = Arc::new(event);

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !diagnostic {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !diagnostic {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Shuts the fan-out down: closes every queue and joins the workers, so
    /// already-queued events are delivered before this returns.
    pub async fn shutdown(self) {
        drop(self.channels);

        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedSender;

    struct Recorder {
        tx: UnboundedSender<EventKind>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            let _ = self.tx.send(event.kind);
        }
    }

    #[tokio::test]
    async fn events_reach_every_subscriber_in_order() {
        let bus = Bus::new(16);
        let (tx_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
        let set = SubscriberSet::new(
            vec![
                Arc::new(Recorder { tx: tx_a }),
                Arc::new(Recorder { tx: tx_b }),
            ],
            bus,
        );

        set.emit(Event::now(EventKind::Starting));
        set.emit(Event::now(EventKind::Exited));
        set.shutdown().await;

        assert_eq!(rx_a.recv().await, Some(EventKind::Starting));
        assert_eq!(rx_a.recv().await, Some(EventKind::Exited));
        assert_eq!(rx_b.recv().await, Some(EventKind::Starting));
        assert_eq!(rx_b.recv().await, Some(EventKind::Exited));
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated_and_reported() {
        let bus = Bus::new(16);
        let mut diagnostics = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panicker)], bus.clone());

        set.emit(Event::now(EventKind::Starting));
        set.shutdown().await;

        let ev = diagnostics.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.error.as_deref(), Some("boom"));
    }
}
