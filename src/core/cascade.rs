//! # Shutdown cascade: reverse-order mass stop.
//!
//! Stops every started process exactly once, tier by tier in **reverse**
//! priority order. Within a tier the stops run concurrently on a [`JoinSet`];
//! the cascade joins the whole tier before touching the next lower one, which
//! is what makes cross-tier stop ordering deterministic.
//!
//! Stop errors are emitted as `"<name> returned error from stop (<err>)"` in
//! the tier's registration order; successful stops are silent. A `stop` that
//! never returns stalls the cascade — bounding is the process's job.

use tokio::task::JoinSet;

use crate::core::driver::StartedTier;
use crate::core::stream::ErrorSink;
use crate::error::{ProcessError, RunnerError};
use crate::events::{Bus, Event, EventKind};
use crate::processes::Process;

/// Stops all started tiers, highest priority first.
pub(crate) async fn run(started: &[StartedTier], sink: &ErrorSink, bus: &Bus) {
    for tier in started.iter().rev() {
        let mut stops: JoinSet<(usize, String, Result<(), ProcessError>)> = JoinSet::new();

        for (idx, member) in tier.members.iter().enumerate() {
            bus.publish(
                Event::now(EventKind::Stopping)
                    .with_unit(member.name.as_str())
                    .with_priority(tier.priority),
            );

            let process = member.process.clone();
            let name = member.name.clone();
            let bus = bus.clone();

            stops.spawn(async move {
                let result = process.stop().await;

                let stopped = Event::now(EventKind::Stopped).with_unit(name.as_str());
                bus.publish(match &result {
                    Ok(()) => stopped,
                    Err(e) => stopped.with_error(e.to_string()),
                });

                (idx, name, result)
            });
        }

        // Tier barrier: every stop in this tier returns before the next
        // lower tier is touched. Errors are emitted in registration order.
        let mut failures: Vec<Option<(String, ProcessError)>> = Vec::new();
        failures.resize_with(tier.members.len(), || None);

        while let Some(joined) = stops.join_next().await {
            if let Ok((idx, name, Err(source))) = joined {
                failures[idx] = Some((name, source));
            }
        }

        for (name, source) in failures.into_iter().flatten() {
            sink.emit(RunnerError::StopFailed { name, source }).await;
        }
    }
}
