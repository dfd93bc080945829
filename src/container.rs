//! # Shared service container.
//!
//! [`ServiceContainer`] is a type-keyed registry for objects shared between
//! units: connection pools, clients, the runner's event [`Bus`](crate::events::Bus).
//! The runner hands it to every [`Initializer::init`](crate::Initializer::init)
//! call; processes capture what they need at construction or during `init`.
//!
//! Services are keyed by their concrete type. Registering a second service of
//! the same type is a programmer error and is rejected, so a duplicate wiring
//! mistake surfaces at startup rather than as silent shadowing.
//!
//! ## Rules
//! - `set` rejects duplicates; `set_default` is first-write-wins.
//! - `get` returns `None` when absent; `require` turns absence into a
//!   [`RunnerError::ServiceNotFound`] for use inside `init`.
//! - The lock guards map operations only; nothing is awaited under it.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::RunnerError;

/// Type-keyed registry of shared services.
///
/// Cheap to share: the runner and all units hold it behind an `Arc`.
#[derive(Default)]
pub struct ServiceContainer {
    services: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under its concrete type.
    ///
    /// Fails with [`RunnerError::DuplicateService`] if a service of the same
    /// type is already present.
    pub fn set<T: Send + Sync + 'static>(&self, service: Arc<T>) -> Result<(), RunnerError> {
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        match services.entry(TypeId::of::<T>()) {
            std::collections::hash_map::Entry::Occupied(_) => Err(RunnerError::DuplicateService {
                type_name: type_name::<T>(),
            }),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(service);
                Ok(())
            }
        }
    }

    /// Registers a service only if the slot is empty. First write wins.
    ///
    /// Used by the runner to publish its own handles (the event bus) without
    /// clobbering one the caller wired in deliberately.
    pub fn set_default<T: Send + Sync + 'static>(&self, service: Arc<T>) {
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        services.entry(TypeId::of::<T>()).or_insert(service);
    }

    /// Returns the service of type `T`, if registered.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let services = self.services.read().unwrap_or_else(|e| e.into_inner());
        services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|any| any.downcast::<T>().ok())
    }

    /// Returns the service of type `T`, or [`RunnerError::ServiceNotFound`].
    ///
    /// The error variant is meant to be mapped into a `ProcessError` by a
    /// failing `init`.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RunnerError> {
        self.get::<T>().ok_or(RunnerError::ServiceNotFound {
            type_name: type_name::<T>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pool {
        size: usize,
    }

    #[test]
    fn set_then_get_round_trips() {
        let container = ServiceContainer::new();
        container.set(Arc::new(Pool { size: 4 })).unwrap();

        let pool = container.get::<Pool>().unwrap();
        assert_eq!(pool.size, 4);
    }

    #[test]
    fn duplicate_set_is_rejected() {
        let container = ServiceContainer::new();
        container.set(Arc::new(Pool { size: 4 })).unwrap();

        let err = container.set(Arc::new(Pool { size: 8 })).unwrap_err();
        assert_eq!(err.as_label(), "runner_duplicate_service");

        // Original registration survives.
        assert_eq!(container.get::<Pool>().unwrap().size, 4);
    }

    #[test]
    fn set_default_is_first_write_wins() {
        let container = ServiceContainer::new();
        container.set_default(Arc::new(Pool { size: 1 }));
        container.set_default(Arc::new(Pool { size: 2 }));

        assert_eq!(container.get::<Pool>().unwrap().size, 1);
    }

    #[test]
    fn require_reports_the_missing_type() {
        let container = ServiceContainer::new();
        let err = container.require::<Pool>().unwrap_err();
        assert_eq!(err.as_label(), "runner_service_not_found");
        assert!(err.to_string().contains("Pool"));
    }
}
