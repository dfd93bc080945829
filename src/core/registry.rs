//! # Registration storage and tier computation.
//!
//! [`Registry`] records initializers (ordered by registration) and process
//! specs. At `run` entry [`Registry::into_tiers`] groups the processes by
//! priority: distinct priorities ascending, registration order preserved
//! within each tier.

use std::collections::BTreeMap;

use crate::processes::{InitializerRef, ProcessSpec};

/// Units accepted before `run`.
#[derive(Default)]
pub(crate) struct Registry {
    initializers: Vec<InitializerRef>,
    processes: Vec<ProcessSpec>,
}

/// Processes sharing one priority, in registration order.
pub(crate) struct Tier {
    pub(crate) priority: u32,
    pub(crate) members: Vec<ProcessSpec>,
}

impl Registry {
    pub(crate) fn add_initializer(&mut self, initializer: InitializerRef) {
        self.initializers.push(initializer);
    }

    pub(crate) fn add_process(&mut self, spec: ProcessSpec) {
        self.processes.push(spec);
    }

    /// Splits the registry into the ordered initializer list and the
    /// ascending tier list.
    pub(crate) fn into_tiers(self) -> (Vec<InitializerRef>, Vec<Tier>) {
        let mut grouped: BTreeMap<u32, Vec<ProcessSpec>> = BTreeMap::new();
        for spec in self.processes {
            grouped.entry(spec.priority()).or_default().push(spec);
        }

        let tiers = grouped
            .into_iter()
            .map(|(priority, members)| Tier { priority, members })
            .collect();

        (self.initializers, tiers)
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

    fn spec(name: &str, priority: u32) -> ProcessSpec {
        ProcessSpec::new(Arc::new(Idle))
            .with_name(name)
            .with_priority(priority)
    }

    #[test]
    fn tiers_are_ascending_with_registration_order_inside() {
        let mut registry = Registry::default();
        registry.add_process(spec("p1", 1));
        registry.add_process(spec("p2", 2));
        registry.add_process(spec("p3", 1));
        registry.add_process(spec("p4", 2));

        let (_, tiers) = registry.into_tiers();
        let shape: Vec<(u32, Vec<&str>)> = tiers
            .iter()
            .map(|t| {
                (
                    t.priority,
                    t.members.iter().map(|s| s.display_name()).collect(),
                )
            })
            .collect();

        assert_eq!(
            shape,
            vec![(1, vec!["p1", "p3"]), (2, vec!["p2", "p4"])]
        );
    }

    #[test]
    fn empty_registry_has_no_tiers() {
        let (initializers, tiers) = Registry::default().into_tiers();
        assert!(initializers.is_empty());
        assert!(tiers.is_empty());
    }
}
