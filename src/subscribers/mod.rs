//! Observability fan-out.
//!
//! [`Subscribe`] is the extension point for logging and metrics: implementors
//! receive every [`Event`](crate::events::Event) the runner publishes.
//! [`SubscriberSet`] delivers events to all subscribers through per-subscriber
//! bounded queues so a slow or panicking subscriber never blocks the runner.
//!
//! The crate ships one reference implementation, [`LogWriter`], behind the
//! `logging` feature.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
