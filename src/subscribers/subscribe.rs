//! # Event subscriber trait.
//!
//! [`Subscribe`] is how callers observe a run: the runner publishes lifecycle
//! [`Event`]s and the fan-out set delivers them to every subscriber through a
//! dedicated worker task with a bounded queue.
//!
//! ## Rules
//! - A slow subscriber only affects itself (queue overflow drops the event
//!   for that subscriber and publishes `SubscriberOverflow`).
//! - Panics are caught and reported as `SubscriberPanicked`; the runtime and
//!   the other subscribers keep going.
//! - Each subscriber sees events in FIFO order.

use async_trait::async_trait;

use crate::events::Event;

/// Receiver of runner lifecycle events.
///
/// Implementations should handle errors internally and avoid blocking; slow
/// processing backs up only this subscriber's queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's worker task, never from the phase driver.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the bounded queue capacity for this subscriber.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
