//! # procvisor
//!
//! **Procvisor** is a process lifecycle runner for long-running services.
//!
//! Registered one-shot *initializers* and long-running *processes* are
//! arranged into priority tiers and driven through a strict lifecycle:
//! sequential init, concurrent start per tier, supervision, and a
//! reverse-order stop cascade that collects every error onto a single
//! closeable stream.
//!
//! ## Features
//!
//! | Area             | Description                                                      | Key types / traits                   |
//! |------------------|------------------------------------------------------------------|--------------------------------------|
//! | **Lifecycle**    | Register, tier, init, start, supervise, stop.                    | [`Runner`], [`ProcessSpec`]          |
//! | **Contracts**    | Units as traits; closure-backed initializers.                    | [`Process`], [`Initializer`], [`InitializerFn`] |
//! | **Workers**      | Periodic tick processes.                                         | [`Worker`], [`WorkerSpec`]           |
//! | **Services**     | Type-keyed container shared with every `init`.                   | [`ServiceContainer`]                 |
//! | **Errors**       | Typed errors for the runner and for units; the error stream.     | [`RunnerError`], [`ProcessError`], [`ErrorStream`] |
//! | **Observability**| Lifecycle events fanned out to subscribers.                      | [`Subscribe`], [`Event`], [`EventKind`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber
//!   _(demo/reference only)_.
//!
//! ```no_run
//! use std::sync::Arc;
//! use procvisor::{Config, ProcessSpec, Runner, ServiceContainer, Worker, WorkerSpec};
//! # use procvisor::ProcessError;
//!
//! struct Heartbeat;
//!
//! #[async_trait::async_trait]
//! impl WorkerSpec for Heartbeat {
//!     async fn tick(&self) -> Result<(), ProcessError> {
//!         println!("lub-dub");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = Runner::new(Arc::new(ServiceContainer::new()));
//!
//!     let heartbeat = Arc::new(Worker::new(Arc::new(Heartbeat)));
//!     runner.register_process(
//!         ProcessSpec::new(heartbeat)
//!             .with_name("heartbeat")
//!             .with_priority(1),
//!     )?;
//!
//!     // SIGINT/SIGTERM trigger the stop cascade.
//!     runner.shutdown_on_signal();
//!
//!     let mut config = Config::new();
//!     config.set("worker_tick_interval", "1000");
//!
//!     let mut errors = runner.run(config, Vec::new())?;
//!     while let Some(err) = errors.recv().await {
//!         eprintln!("runner: {err}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ---

mod config;
mod container;
mod core;
mod error;
mod processes;
mod subscribers;

pub mod events;

// ---- Public re-exports ----

pub use config::Config;
pub use container::ServiceContainer;
pub use crate::core::{ErrorStream, Runner};
pub use error::{ProcessError, RunnerError};
pub use events::{Event, EventKind};
pub use processes::{
    Initializer, InitializerFn, InitializerRef, Process, ProcessRef, ProcessSpec, Worker,
    WorkerSpec, WORKER_TICK_INTERVAL_KEY,
};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
