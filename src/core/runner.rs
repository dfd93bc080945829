//! # Runner: the public lifecycle facade.
//!
//! A [`Runner`] accepts registrations (initializers in order, processes with
//! [`ProcessSpec`] metadata), then drives them through the full lifecycle on
//! a single `run` call:
//!
//! - initializers, serially, in registration order;
//! - each priority tier: serial init, concurrent start;
//! - supervision until a fatal exit or an external [`shutdown`](Runner::shutdown);
//! - reverse-tier stop cascade with per-process error collection.
//!
//! `run` returns an [`ErrorStream`]; its close is the "fully stopped" signal.
//!
//! ## Rules
//! - A runner is single-use: `run` at most once, registrations only before it.
//! - `shutdown` is idempotent and safe from any task once `run` has begun.
//! - The runner publishes every lifecycle edge to its event bus; formatting
//!   belongs to the [`Subscribe`] implementations handed to `run`.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::container::ServiceContainer;
use crate::core::driver::Driver;
use crate::core::registry::Registry;
use crate::core::shutdown::wait_for_shutdown_signal;
use crate::core::stream::{self, ErrorStream};
use crate::error::RunnerError;
use crate::events::{Bus, EventKind};
use crate::processes::{InitializerRef, ProcessSpec};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Capacity of the lifecycle event bus.
const BUS_CAPACITY: usize = 1024;

/// Lifecycle orchestrator for registered initializers and processes.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use procvisor::{Config, ProcessSpec, Runner, ServiceContainer, Worker};
/// # use procvisor::{ProcessError, WorkerSpec};
/// # struct Heartbeat;
/// # #[async_trait::async_trait]
/// # impl WorkerSpec for Heartbeat {
/// #     async fn tick(&self) -> Result<(), ProcessError> { Ok(()) }
/// # }
///
/// #[tokio::main]
/// async fn main() {
///     let runner = Runner::new(Arc::new(ServiceContainer::new()));
///     runner
///         .register_process(
///             ProcessSpec::new(Arc::new(Worker::new(Arc::new(Heartbeat))))
///                 .with_name("heartbeat")
///                 .with_priority(1),
///         )
///         .unwrap();
///
///     runner.shutdown_on_signal();
///
///     let mut config = Config::new();
///     config.set("worker_tick_interval", "1000");
///
///     let mut errors = runner.run(config, Vec::new()).unwrap();
///     while let Some(err) = errors.recv().await {
///         eprintln!("{err}");
///     }
/// }
/// ```
pub struct Runner {
    container: Arc<ServiceContainer>,
    registry: Mutex<Option<Registry>>,
    shutdown: CancellationToken,
}

impl Runner {
    /// Creates a runner around a shared service container.
    pub fn new(container: Arc<ServiceContainer>) -> Self {
        Self {
            container,
            registry: Mutex::new(Some(Registry::default())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Registers a one-shot initializer; registration order is execution
    /// order.
    ///
    /// Fails with [`RunnerError::RegistrationClosed`] once `run` has been
    /// called.
    pub fn register_initializer(&self, initializer: InitializerRef) -> Result<(), RunnerError> {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .as_mut()
            .ok_or(RunnerError::RegistrationClosed)?
            .add_initializer(initializer);
        Ok(())
    }

    /// Registers a process with its metadata.
    ///
    /// Fails with [`RunnerError::RegistrationClosed`] once `run` has been
    /// called.
    pub fn register_process(&self, spec: ProcessSpec) -> Result<(), RunnerError> {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry
            .as_mut()
            .ok_or(RunnerError::RegistrationClosed)?
            .add_process(spec);
        Ok(())
    }

    /// Requests the shutdown cascade from outside.
    ///
    /// Idempotent; concurrent calls collapse into a single cascade. Emits no
    /// error on the stream.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Spawns a listener that calls [`shutdown`](Runner::shutdown) when the
    /// OS delivers a termination signal.
    pub fn shutdown_on_signal(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if wait_for_shutdown_signal().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    /// Runs the full lifecycle; must be called from a tokio runtime.
    ///
    /// Closes the registration surface, spawns the phase driver and returns
    /// the error stream immediately. The stream yields runtime errors in
    /// observation order and closes once the runner has fully stopped; a
    /// closed stream with no values is a clean shutdown.
    ///
    /// Runner instances are single-use: a second call fails with
    /// [`RunnerError::AlreadyRan`].
    pub fn run(
        &self,
        config: Config,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<ErrorStream, RunnerError> {
        let registry = {
            let mut slot = self.registry.lock().unwrap_or_else(|e| e.into_inner());
            slot.take().ok_or(RunnerError::AlreadyRan)?
        };
        let (initializers, tiers) = registry.into_tiers();

        let bus = Bus::new(BUS_CAPACITY);
        let set = SubscriberSet::new(subscribers, bus.clone());
        spawn_event_forwarder(&bus, set);

        // Sentinel slot: units can reach the lifecycle event surface through
        // the container. First write wins, in case the caller wired one in.
        self.container.set_default(Arc::new(bus.clone()));

        let (sink, stream) = stream::channel();
        let driver = Driver {
            config: Arc::new(config),
            services: self.container.clone(),
            bus,
            sink,
            shutdown: self.shutdown.clone(),
            initializers,
            tiers,
        };
        tokio::spawn(driver.run());

        Ok(stream)
    }
}

/// Forwards bus events into the subscriber fan-out.
///
/// The terminal `Halted` event doubles as the flush signal: it is delivered,
/// then the set is shut down so queued events drain before the task exits.
fn spawn_event_forwarder(bus: &Bus, set: SubscriberSet) {
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let halted = ev.kind == EventKind::Halted;
                    set.emit(ev);
                    if halted {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
        set.shutdown().await;
    });
}
