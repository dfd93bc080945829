//! # Phase driver: the runner's sequential state machine.
//!
//! One driver task owns the whole run:
//!
//! ```text
//! initializer phase          init₁ → init₂ → …        (serial, registration order)
//!     │ failure → emit "failed to initialize …", unwind
//!     ▼
//! tier loop (ascending)      per tier: init serially, then start concurrently
//!     │                      start tasks ack their invocation (barrier) and
//!     │                      report completions on the conduit
//!     ▼
//! supervision                select { completion conduit, shutdown token }
//!     │ fatal / external → cascade (reverse tier order)
//!     │ all silent exits → no cascade
//!     ▼
//! drain conduit, publish Halted, close the error stream
//! ```
//!
//! ## Rules
//! - The driver never waits for a `start` to return; it waits only for the
//!   invocation barrier (every start future polled once) before the next
//!   tier's init sub-phase.
//! - A process that fails `init` aborts the run; same-tier processes whose
//!   `init` already succeeded are neither started nor stopped — `stop` pairs
//!   with a successful start transition, not with `init`.
//! - The first fatal event locks the cascade trigger; later completions that
//!   carry errors still have their messages emitted, but cannot re-trigger.
//! - The completion conduit is sized to the process count, so start tasks
//!   never block reporting and the stream always closes.

use std::sync::Arc;

use futures::future::poll_immediate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::container::ServiceContainer;
use crate::core::cascade;
use crate::core::registry::Tier;
use crate::core::stream::ErrorSink;
use crate::error::{ProcessError, RunnerError};
use crate::events::{Bus, Event, EventKind};
use crate::processes::{Initializer, InitializerRef, Process, ProcessRef};

/// Report sent by a start task when its `start` has returned.
struct Completion {
    name: String,
    silent_exit: bool,
    result: Result<(), ProcessError>,
}

/// A process whose `start` has been issued; the cascade's unit of work.
pub(crate) struct StartedProcess {
    pub(crate) name: String,
    pub(crate) process: ProcessRef,
}

/// All started processes of one tier, in registration order.
pub(crate) struct StartedTier {
    pub(crate) priority: u32,
    pub(crate) members: Vec<StartedProcess>,
}

/// Outcome of the supervision loop.
enum Verdict {
    /// Every started process exited benignly; nothing left to stop.
    AllBenign,
    /// A fatal event or an external shutdown request; run the cascade.
    Cascade,
}

/// State for one run, consumed by [`Driver::run`].
pub(crate) struct Driver {
    pub(crate) config: Arc<Config>,
    pub(crate) services: Arc<ServiceContainer>,
    pub(crate) bus: Bus,
    pub(crate) sink: ErrorSink,
    pub(crate) shutdown: CancellationToken,
    pub(crate) initializers: Vec<InitializerRef>,
    pub(crate) tiers: Vec<Tier>,
}

impl Driver {
    /// Drives the run to completion. Dropping `self.sink` at the end is what
    /// closes the error stream, exactly once.
    pub(crate) async fn run(mut self) {
        let total: usize = self.tiers.iter().map(|t| t.members.len()).sum();
        let (completion_tx, mut completions) = mpsc::channel::<Completion>(total.max(1));

        let mut started: Vec<StartedTier> = Vec::new();
        let launched = self.launch(&completion_tx, &mut started).await;
        drop(completion_tx);

        let mut outstanding: usize = started.iter().map(|t| t.members.len()).sum();

        let verdict = if launched {
            self.supervise(&mut completions, &mut outstanding).await
        } else {
            Verdict::Cascade
        };

        if matches!(verdict, Verdict::Cascade) {
            cascade::run(&started, &self.sink, &self.bus).await;
        }

        // Every start task reports exactly once; late errors are still
        // emitted, late clean returns are only counted.
        while outstanding > 0 {
            let Some(c) = completions.recv().await else {
                break;
            };
            outstanding -= 1;
            if let Err(source) = c.result {
                self.sink
                    .emit(RunnerError::StartFatal {
                        name: c.name,
                        source,
                    })
                    .await;
            }
        }

        self.bus.publish(Event::now(EventKind::Halted));
    }

    /// Initializer phase plus the tier loop.
    ///
    /// Returns false when an `init` failed; `started` then holds only the
    /// tiers whose start sub-phase completed, which is exactly the cascade's
    /// target set.
    async fn launch(
        &mut self,
        completion_tx: &mpsc::Sender<Completion>,
        started: &mut Vec<StartedTier>,
    ) -> bool {
        for unit in std::mem::take(&mut self.initializers) {
            let name = unit.name().to_string();
            let init = unit.init(self.config.clone(), self.services.clone());
            if !self.init_unit(&name, None, init).await {
                return false;
            }
        }

        for tier in std::mem::take(&mut self.tiers) {
            for spec in &tier.members {
                let name = spec.display_name().to_string();
                let init = spec.process().init(self.config.clone(), self.services.clone());
                if !self.init_unit(&name, Some(tier.priority), init).await {
                    return false;
                }
            }

            started.push(self.start_tier(tier, completion_tx).await);
        }

        true
    }

    /// Runs one `init` on the driver task, publishing the outcome.
    ///
    /// On failure emits the init error and returns false.
    async fn init_unit(
        &self,
        name: &str,
        priority: Option<u32>,
        init: impl std::future::Future<Output = Result<(), ProcessError>>,
    ) -> bool {
        let tag = |kind: EventKind| {
            let ev = Event::now(kind).with_unit(name);
            match priority {
                Some(p) => ev.with_priority(p),
                None => ev,
            }
        };

        self.bus.publish(tag(EventKind::Initializing));
        match init.await {
            Ok(()) => {
                self.bus.publish(tag(EventKind::Initialized));
                true
            }
            Err(source) => {
                self.bus
                    .publish(tag(EventKind::InitFailed).with_error(source.to_string()));
                self.sink
                    .emit(RunnerError::InitFailed {
                        name: name.to_string(),
                        source,
                    })
                    .await;
                false
            }
        }
    }

    /// Start sub-phase: one task per process, then the invocation barrier.
    ///
    /// Each task publishes `Starting`, polls the start future once (so the
    /// invocation has really been issued, and a synchronous failure is
    /// captured), acks the barrier, and finally reports on the conduit.
    async fn start_tier(
        &self,
        tier: Tier,
        completion_tx: &mpsc::Sender<Completion>,
    ) -> StartedTier {
        let count = tier.members.len();
        let (ack_tx, mut acks) = mpsc::channel::<()>(count.max(1));
        let mut members = Vec::with_capacity(count);

        for spec in tier.members {
            let name = spec.display_name().to_string();
            members.push(StartedProcess {
                name: name.clone(),
                process: spec.process().clone(),
            });

            let process = spec.process().clone();
            let silent_exit = spec.silent_exit();
            let priority = tier.priority;
            let ack = ack_tx.clone();
            let completion = completion_tx.clone();
            let bus = self.bus.clone();

            tokio::spawn(async move {
                bus.publish(
                    Event::now(EventKind::Starting)
                        .with_unit(name.as_str())
                        .with_priority(priority),
                );

                let mut fut = Box::pin(process.start());
                let immediate = poll_immediate(&mut fut).await;

                let _ = ack.send(()).await;
                drop(ack);

                let result = match immediate {
                    Some(result) => result,
                    None => fut.await,
                };

                let exited = Event::now(EventKind::Exited).with_unit(name.as_str());
                bus.publish(match &result {
                    Ok(()) => exited,
                    Err(e) => exited.with_error(e.to_string()),
                });

                let _ = completion
                    .send(Completion {
                        name,
                        silent_exit,
                        result,
                    })
                    .await;
            });
        }

        drop(ack_tx);
        for _ in 0..count {
            if acks.recv().await.is_none() {
                break;
            }
        }

        StartedTier {
            priority: tier.priority,
            members,
        }
    }

    /// Watches the completion conduit and the external shutdown signal.
    async fn supervise(
        &self,
        completions: &mut mpsc::Receiver<Completion>,
        outstanding: &mut usize,
    ) -> Verdict {
        if *outstanding == 0 {
            return Verdict::AllBenign;
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    self.bus.publish(Event::now(EventKind::ShutdownRequested));
                    return Verdict::Cascade;
                }
                completion = completions.recv() => {
                    let Some(c) = completion else {
                        return Verdict::AllBenign;
                    };
                    *outstanding -= 1;

                    match c.result {
                        Err(source) => {
                            self.sink
                                .emit(RunnerError::StartFatal { name: c.name, source })
                                .await;
                            return Verdict::Cascade;
                        }
                        Ok(()) if c.silent_exit => {
                            if *outstanding == 0 {
                                return Verdict::AllBenign;
                            }
                        }
                        Ok(()) => {
                            self.sink
                                .emit(RunnerError::StartFatal {
                                    name: c.name,
                                    source: ProcessError::ExitedCleanly,
                                })
                                .await;
                            return Verdict::Cascade;
                        }
                    }
                }
            }
        }
    }
}
