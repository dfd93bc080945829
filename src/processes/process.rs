//! # Unit contracts: initializers and processes.
//!
//! An [`Initializer`] is a one-shot setup unit: the runner calls `init` once,
//! on the driver task, before any process starts. A [`Process`] extends the
//! contract with `start` / `stop` for long-running work. The shared handle
//! types are [`InitializerRef`] and [`ProcessRef`].
//!
//! ## Rules
//! - `init` runs serially on the driver task; keep it bounded.
//! - `start` is expected to block (await) until the process decides to exit
//!   or until `stop` is invoked.
//! - `stop` may be called at any time after `init` returns, including before
//!   `start` has returned, and may be called more than once: implementations
//!   own an idempotence latch (a `CancellationToken` works well; see
//!   [`Worker`](crate::Worker)).

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::container::ServiceContainer;
use crate::error::ProcessError;

/// Shared handle to an initializer.
pub type InitializerRef = Arc<dyn Initializer>;

/// Shared handle to a process.
pub type ProcessRef = Arc<dyn Process>;

/// One-shot setup unit.
///
/// Every [`Process`] is also an `Initializer`; a bare initializer is simply a
/// unit with nothing to run after setup.
#[async_trait]
pub trait Initializer: Send + Sync + 'static {
    /// Returns the unit's display name, used in error messages and events.
    ///
    /// Defaults to the concrete type name; registration can override it for
    /// processes via [`ProcessSpec::with_name`](crate::ProcessSpec::with_name).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Performs one-time setup.
    ///
    /// Called exactly once, before any process of the same or a higher tier
    /// is started. The configuration source and the service container are
    /// threaded in explicitly; units fetch what they need and may register
    /// shared services for later units.
    async fn init(
        &self,
        config: Arc<Config>,
        services: Arc<ServiceContainer>,
    ) -> Result<(), ProcessError>;
}

/// Long-running unit with a full init/start/stop lifecycle.
#[async_trait]
pub trait Process: Initializer {
    /// Runs the process until it exits or is stopped.
    ///
    /// Invoked on its own task after every process in strictly-lower tiers
    /// has had `start` issued. A return value of `Ok(())` is fatal to the
    /// system unless the process was registered with
    /// [`with_silent_exit`](crate::ProcessSpec::with_silent_exit).
    async fn start(&self) -> Result<(), ProcessError>;

    /// Requests the process to exit; `start` must return promptly.
    ///
    /// Must be idempotent and safe to call before `start` has returned. The
    /// cascade calls it exactly once per started process, but the process's
    /// own logic may have called it already.
    async fn stop(&self) -> Result<(), ProcessError>;
}
