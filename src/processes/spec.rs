//! # Registration record for a process.
//!
//! [`ProcessSpec`] bundles a [`ProcessRef`] with the metadata attached at
//! registration time:
//!
//! - **priority** — tier key; lower tiers initialize and start first and stop
//!   last (default 0).
//! - **name** — display string for error messages and events (default: the
//!   process's own [`name`](crate::Initializer::name), synthesized from the
//!   concrete type).
//! - **silent exit** — whether a *successful* return from `start` is benign
//!   rather than fatal (default: fatal).
//!
//! Metadata lives in this record, not in the process itself, so the same
//! process object could be registered under different names or tiers.

use crate::processes::{Initializer, ProcessRef};

/// Specification for running a process under the runner.
#[derive(Clone)]
pub struct ProcessSpec {
    process: ProcessRef,
    name: Option<String>,
    priority: u32,
    silent_exit: bool,
}

impl ProcessSpec {
    /// Creates a spec with default metadata: tier 0, type-derived name,
    /// fatal on clean exit.
    pub fn new(process: ProcessRef) -> Self {
        Self {
            process,
            name: None,
            priority: 0,
            silent_exit: false,
        }
    }

    /// Sets the priority tier.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks a natural return from `start` as benign.
    pub fn with_silent_exit(mut self) -> Self {
        self.silent_exit = true;
        self
    }

    /// Returns a handle to the process.
    pub fn process(&self) -> &ProcessRef {
        &self.process
    }

    /// Returns the display name: the override, or the process's own name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.process.name())
    }

    /// Returns the priority tier.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns whether a clean exit is benign.
    pub fn silent_exit(&self) -> bool {
        self.silent_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;
    use crate::processes::{Initializer, Process};
    use crate::{Config, ServiceContainer};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Idle;

    #[async_trait]
    impl Initializer for Idle {
        async fn init(
            &self,
            _config: Arc<Config>,
            _services: Arc<ServiceContainer>,
        ) -> Result<(), ProcessError> {
            Ok(())
        }
    }

    #[async_trait]
    impl Process for Idle {
        async fn start(&self) -> Result<(), ProcessError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), ProcessError> {
            Ok(())
        }
    }

    #[test]
    fn defaults() {
        let spec = ProcessSpec::new(Arc::new(Idle));
        assert_eq!(spec.priority(), 0);
        assert!(!spec.silent_exit());
        assert!(spec.display_name().contains("Idle"));
    }

    #[test]
    fn options_override_defaults() {
        let spec = ProcessSpec::new(Arc::new(Idle))
            .with_priority(3)
            .with_name("idle")
            .with_silent_exit();

        assert_eq!(spec.priority(), 3);
        assert_eq!(spec.display_name(), "idle");
        assert!(spec.silent_exit());
    }
}
