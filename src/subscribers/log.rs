//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [initializing] unit=db-migrations
//! [initialized] unit=db-migrations
//! [init-failed] unit=cache err="dial timed out"
//! [starting] process=http prio=1
//! [exited] process=http err="listener closed"
//! [shutdown-requested]
//! [stopping] process=http prio=1
//! [stopped] process=http
//! [halted]
//! ```
//!
//! Not intended for production use; implement a custom
//! [`Subscribe`](crate::Subscribe) for structured logging or metrics.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout logging subscriber, enabled via the `logging` feature.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Initializing => {
                if let Some(unit) = &e.unit {
                    println!("[initializing] unit={unit}");
                }
            }
            EventKind::Initialized => {
                if let Some(unit) = &e.unit {
                    println!("[initialized] unit={unit}");
                }
            }
            EventKind::InitFailed => {
                println!("[init-failed] unit={:?} err={:?}", e.unit, e.error);
            }
            EventKind::Starting => {
                println!("[starting] process={:?} prio={:?}", e.unit, e.priority);
            }
            EventKind::Exited => match &e.error {
                Some(err) => println!("[exited] process={:?} err={err:?}", e.unit),
                None => println!("[exited] process={:?}", e.unit),
            },
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::Stopping => {
                println!("[stopping] process={:?} prio={:?}", e.unit, e.priority);
            }
            EventKind::Stopped => match &e.error {
                Some(err) => println!("[stopped] process={:?} err={err:?}", e.unit),
                None => println!("[stopped] process={:?}", e.unit),
            },
            EventKind::Halted => {
                println!("[halted]");
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] {:?}", e.error);
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] name={:?} {:?}", e.unit, e.error);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
