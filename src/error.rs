//! # Error types used by the runner and by process implementations.
//!
//! This module defines two error enums:
//!
//! - [`RunnerError`] errors raised by the orchestration runtime itself and
//!   carried on the error stream returned from [`Runner::run`](crate::Runner::run).
//! - [`ProcessError`] errors raised by individual unit operations
//!   (`init` / `start` / `stop`).
//!
//! Both types provide an `as_label` helper returning a short stable tag for
//! logs and metrics.
//!
//! The display strings of the stream-carried variants are part of the crate's
//! contract: consumers match on them, so they keep the
//! `"<name> <what happened> (<reason>)"` shape.

use thiserror::Error;

/// # Errors produced by unit operations.
///
/// Returned by [`Initializer::init`](crate::Initializer::init),
/// [`Process::start`](crate::Process::start) and
/// [`Process::stop`](crate::Process::stop).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Failure reported by the unit itself.
    ///
    /// Displays as the reason verbatim, with no decoration; the runner wraps
    /// it into a [`RunnerError`] that supplies the context.
    #[error("{0}")]
    Failed(String),

    /// Sentinel for a process whose `start` returned success without the
    /// silent-exit flag. Such a return is still fatal to the system.
    #[error("exited cleanly")]
    ExitedCleanly,

    /// Required configuration was missing or could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProcessError {
    /// Convenience constructor for [`ProcessError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        ProcessError::Failed(reason.into())
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessError::Failed(_) => "process_failed",
            ProcessError::ExitedCleanly => "process_exited_cleanly",
            ProcessError::Config(_) => "process_bad_config",
        }
    }
}

/// # Errors produced by the runner.
///
/// The first three variants travel on the [`ErrorStream`](crate::ErrorStream);
/// the rest surface synchronously from registration and container calls.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunnerError {
    /// An initializer or a process `init` returned an error; the run unwinds.
    #[error("failed to initialize {name} ({source})")]
    InitFailed {
        /// Display name of the failing unit.
        name: String,
        /// The underlying failure.
        #[source]
        source: ProcessError,
    },

    /// A process `start` returned an error, or returned success without the
    /// silent-exit flag; either way the system comes down.
    #[error("{name} returned a fatal error ({source})")]
    StartFatal {
        /// Display name of the exiting process.
        name: String,
        /// The start error, or [`ProcessError::ExitedCleanly`].
        #[source]
        source: ProcessError,
    },

    /// A process `stop` returned an error during the shutdown cascade.
    /// Emitted for observation; the cascade continues regardless.
    #[error("{name} returned error from stop ({source})")]
    StopFailed {
        /// Display name of the process.
        name: String,
        /// The stop error.
        #[source]
        source: ProcessError,
    },

    /// A registration arrived after `run` was called.
    #[error("registration closed: runner already started")]
    RegistrationClosed,

    /// `run` was called twice; runner instances are single-use.
    #[error("runner already ran: instances are single-use")]
    AlreadyRan,

    /// A service of this type is already registered in the container.
    #[error("duplicate service registration for type `{type_name}`")]
    DuplicateService {
        /// Type name of the rejected service.
        type_name: &'static str,
    },

    /// No service of the requested type is registered in the container.
    #[error("no service registered for type `{type_name}`")]
    ServiceNotFound {
        /// Type name of the missing service.
        type_name: &'static str,
    },
}

impl RunnerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::InitFailed { .. } => "runner_init_failed",
            RunnerError::StartFatal { .. } => "runner_start_fatal",
            RunnerError::StopFailed { .. } => "runner_stop_failed",
            RunnerError::RegistrationClosed => "runner_registration_closed",
            RunnerError::AlreadyRan => "runner_already_ran",
            RunnerError::DuplicateService { .. } => "runner_duplicate_service",
            RunnerError::ServiceNotFound { .. } => "runner_service_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_messages_are_bit_exact() {
        let init = RunnerError::InitFailed {
            name: "foo".into(),
            source: ProcessError::failed("error in init"),
        };
        assert_eq!(init.to_string(), "failed to initialize foo (error in init)");

        let fatal = RunnerError::StartFatal {
            name: "bar".into(),
            source: ProcessError::failed("error in start"),
        };
        assert_eq!(fatal.to_string(), "bar returned a fatal error (error in start)");

        let stop = RunnerError::StopFailed {
            name: "foo".into(),
            source: ProcessError::failed("error in stop"),
        };
        assert_eq!(stop.to_string(), "foo returned error from stop (error in stop)");
    }

    #[test]
    fn clean_exit_sentinel() {
        let fatal = RunnerError::StartFatal {
            name: "worker".into(),
            source: ProcessError::ExitedCleanly,
        };
        assert_eq!(
            fatal.to_string(),
            "worker returned a fatal error (exited cleanly)"
        );
    }

    #[test]
    fn process_error_displays_reason_verbatim() {
        assert_eq!(ProcessError::failed("boom").to_string(), "boom");
        assert_eq!(ProcessError::failed("boom").as_label(), "process_failed");
    }
}
