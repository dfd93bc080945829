//! # Lifecycle events emitted by the runner.
//!
//! [`EventKind`] classifies events across the run:
//!
//! - **Init phase**: `Initializing`, `Initialized`, `InitFailed`
//! - **Start / supervision**: `Starting`, `Exited`
//! - **Shutdown**: `ShutdownRequested`, `Stopping`, `Stopped`, `Halted`
//! - **Subscriber internals**: `SubscriberOverflow`, `SubscriberPanicked`
//!
//! [`Event`] carries optional metadata: the unit's display name, its priority
//! tier, and an error string for failure edges.
//!
//! ## Ordering
//! Each event gets a globally unique, monotonically increasing sequence
//! number (`seq`), so consumers can re-establish order even when events cross
//! async channel boundaries.
//!
//! ## Lifecycle flow
//! ```text
//! Initializing ─► Initialized            (per unit, registration order)
//!             └─► InitFailed             (aborts the run)
//!
//! Starting ─► Exited                     (per process; Exited carries the
//!                                         error when start failed)
//!
//! ShutdownRequested ─► Stopping ─► Stopped   (cascade, reverse tier order)
//!                                   └─ Halted (stream about to close)
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Subscriber panicked during event processing.
    SubscriberPanicked,
    /// Subscriber dropped an event (queue full or worker closed).
    SubscriberOverflow,

    /// A unit's `init` is about to run.
    Initializing,
    /// A unit's `init` returned success.
    Initialized,
    /// A unit's `init` returned an error; the run unwinds.
    InitFailed,

    /// A process's `start` invocation has been issued.
    Starting,
    /// A process's `start` returned (the error field is set when it failed).
    Exited,

    /// The shutdown cascade has been triggered.
    ShutdownRequested,
    /// A process's `stop` is about to run.
    Stopping,
    /// A process's `stop` returned (the error field is set when it failed).
    Stopped,

    /// The run is over; the error stream is about to close.
    Halted,
}

/// Lifecycle event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp (may go backwards, use for logging only).
    pub at: SystemTime,
    /// The kind of event.
    pub kind: EventKind,
    /// Display name of the unit, if applicable.
    pub unit: Option<String>,
    /// Priority tier of the process, if applicable.
    pub priority: Option<u32>,
    /// Error message, if the event represents a failure.
    pub error: Option<String>,
}

impl Event {
    /// Creates a new event of the given kind with the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            unit: None,
            priority: None,
            error: None,
        }
    }

    /// Attaches a unit display name.
    pub fn with_unit(mut self, name: impl Into<String>) -> Self {
        self.unit = Some(name.into());
        self
    }

    /// Attaches a priority tier.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attaches an error message.
    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }

    /// Creates a subscriber overflow event.
    ///
    /// Emitted when a subscriber's queue is full and an event is dropped.
    pub(crate) fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_error(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_unit(subscriber)
            .with_error(info)
    }

    /// True for the internal subscriber diagnostics kinds.
    pub(crate) fn is_subscriber_diagnostic(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_strictly_increasing() {
        let a = Event::now(EventKind::Starting);
        let b = Event::now(EventKind::Exited);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::now(EventKind::Stopped)
            .with_unit("worker")
            .with_priority(2)
            .with_error("boom");

        assert_eq!(ev.kind, EventKind::Stopped);
        assert_eq!(ev.unit.as_deref(), Some("worker"));
        assert_eq!(ev.priority, Some(2));
        assert_eq!(ev.error.as_deref(), Some("boom"));
    }
}
