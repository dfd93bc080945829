//! Unit contracts and registration metadata.
//!
//! - [`Initializer`] — one-shot setup unit: `init` only.
//! - [`Process`] — long-running unit: `init`, then a blocking `start`, with an
//!   idempotent `stop` that makes `start` return promptly.
//! - [`InitializerFn`] — closure-backed initializer.
//! - [`ProcessSpec`] — registration record: priority tier, display name,
//!   silent-exit flag.
//! - [`Worker`] — reference [`Process`] implementation that ticks a
//!   [`WorkerSpec`] on a fixed interval.

mod init_fn;
mod process;
mod spec;
mod worker;

pub use init_fn::InitializerFn;
pub use process::{Initializer, InitializerRef, Process, ProcessRef};
pub use spec::ProcessSpec;
pub use worker::{Worker, WorkerSpec, WORKER_TICK_INTERVAL_KEY};
