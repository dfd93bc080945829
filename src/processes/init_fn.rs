//! # Function-backed initializer.
//!
//! [`InitializerFn`] wraps an async closure as an [`Initializer`], for setup
//! steps that do not deserve a named type. Use [`InitializerFn::arc`] for a
//! one-liner that returns an [`InitializerRef`].
//!
//! The closure is `Fn`, so `init` can hand out fresh futures without interior
//! locking; capture shared state behind `Arc` if the closure needs any.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::container::ServiceContainer;
use crate::error::ProcessError;
use crate::processes::{Initializer, InitializerRef};

/// Closure-backed [`Initializer`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use procvisor::{Config, Initializer, InitializerFn, InitializerRef, ServiceContainer};
///
/// struct Pool;
///
/// let seed_pool: InitializerRef = InitializerFn::arc("seed-pool", |_config, services| async move {
///     services
///         .set(Arc::new(Pool))
///         .map_err(|e| procvisor::ProcessError::failed(e.to_string()))
/// });
///
/// assert_eq!(seed_pool.name(), "seed-pool");
/// ```
pub struct InitializerFn<F, Fut>
where
    F: Fn(Arc<Config>, Arc<ServiceContainer>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessError>> + Send + 'static,
{
    name: Cow<'static, str>,
    func: F,
}

impl<F, Fut> InitializerFn<F, Fut>
where
    F: Fn(Arc<Config>, Arc<ServiceContainer>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessError>> + Send + 'static,
{
    /// Creates a new function-backed initializer.
    pub fn new(name: impl Into<Cow<'static, str>>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    /// Creates the initializer and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, func: F) -> InitializerRef {
        Arc::new(Self::new(name, func))
    }
}

#[async_trait]
impl<F, Fut> Initializer for InitializerFn<F, Fut>
where
    F: Fn(Arc<Config>, Arc<ServiceContainer>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(
        &self,
        config: Arc<Config>,
        services: Arc<ServiceContainer>,
    ) -> Result<(), ProcessError> {
        (self.func)(config, services).await
    }
}
