//! # Periodic worker process.
//!
//! [`Worker`] is the crate's reference [`Process`] implementation: it drives a
//! [`WorkerSpec`] — a `tick` callback plus optional setup — on a fixed
//! interval until stopped.
//!
//! ```text
//! init  ─► read tick interval from Config ─► spec.init()
//! start ─► loop { halt? break : sleep(interval) ─► spec.tick()? }
//! stop  ─► trip halt token (idempotent), start returns on next poll
//! ```
//!
//! A tick error halts the worker and is returned from `start`, so unless the
//! worker is registered with silent exit, a failing tick brings the system
//! down through the normal fatal path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::container::ServiceContainer;
use crate::error::ProcessError;
use crate::processes::{Initializer, Process};

/// Config key for the tick interval, in integer milliseconds. Required.
pub const WORKER_TICK_INTERVAL_KEY: &str = "worker_tick_interval";

/// Work performed by a [`Worker`] on each tick.
#[async_trait]
pub trait WorkerSpec: Send + Sync + 'static {
    /// One-time setup, run from the worker's `init`. Defaults to a no-op.
    async fn init(
        &self,
        _config: Arc<Config>,
        _services: Arc<ServiceContainer>,
    ) -> Result<(), ProcessError> {
        Ok(())
    }

    /// One unit of periodic work. An error halts the worker.
    async fn tick(&self) -> Result<(), ProcessError>;
}

/// Process that ticks a [`WorkerSpec`] on a fixed interval.
pub struct Worker {
    spec: Arc<dyn WorkerSpec>,
    halt: CancellationToken,
    interval: std::sync::Mutex<Duration>,
}

impl Worker {
    /// Creates a worker around the given spec.
    ///
    /// The tick interval is read from [`Config`] during `init`
    /// (key [`WORKER_TICK_INTERVAL_KEY`]).
    pub fn new(spec: Arc<dyn WorkerSpec>) -> Self {
        Self {
            spec,
            halt: CancellationToken::new(),
            interval: std::sync::Mutex::new(Duration::ZERO),
        }
    }

    /// Returns true once the worker has been told to halt.
    pub fn halted(&self) -> bool {
        self.halt.is_cancelled()
    }

    fn tick_interval(&self) -> Duration {
        *self.interval.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Initializer for Worker {
    fn name(&self) -> &str {
        "worker"
    }

    async fn init(
        &self,
        config: Arc<Config>,
        services: Arc<ServiceContainer>,
    ) -> Result<(), ProcessError> {
        let interval = config
            .get_duration_ms(WORKER_TICK_INTERVAL_KEY)?
            .ok_or_else(|| {
                ProcessError::Config(format!("`{WORKER_TICK_INTERVAL_KEY}` is not set"))
            })?;

        *self.interval.lock().unwrap_or_else(|e| e.into_inner()) = interval;
        self.spec.init(config, services).await
    }
}

#[async_trait]
impl Process for Worker {
    async fn start(&self) -> Result<(), ProcessError> {
        let interval = self.tick_interval();

        loop {
            tokio::select! {
                _ = self.halt.cancelled() => return Ok(()),
                _ = sleep(interval) => {}
            }

            if let Err(e) = self.spec.tick().await {
                self.halt.cancel();
                return Err(e);
            }
        }
    }

    async fn stop(&self) -> Result<(), ProcessError> {
        self.halt.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        ticks: AtomicUsize,
    }

    #[async_trait]
    impl WorkerSpec for Counter {
        async fn tick(&self) -> Result<(), ProcessError> {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn config_with_tick(ms: &str) -> Arc<Config> {
        let mut cfg = Config::new();
        cfg.set(WORKER_TICK_INTERVAL_KEY, ms);
        Arc::new(cfg)
    }

    #[tokio::test]
    async fn init_requires_tick_interval() {
        let worker = Worker::new(Arc::new(Counter {
            ticks: AtomicUsize::new(0),
        }));

        let err = worker
            .init(Arc::new(Config::new()), Arc::new(ServiceContainer::new()))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "process_bad_config");
    }

    #[tokio::test]
    async fn ticks_until_stopped() {
        let spec = Arc::new(Counter {
            ticks: AtomicUsize::new(0),
        });
        let worker = Arc::new(Worker::new(spec.clone()));
        worker
            .init(config_with_tick("5"), Arc::new(ServiceContainer::new()))
            .await
            .unwrap();

        let running = tokio::spawn({
            let worker = worker.clone();
            async move { worker.start().await }
        });

        tokio::time::sleep(Duration::from_millis(40)).await;
        worker.stop().await.unwrap();

        assert_eq!(running.await.unwrap(), Ok(()));
        assert!(spec.ticks.load(Ordering::SeqCst) >= 2);
        assert!(worker.halted());
    }

    struct FailingTick;

    #[async_trait]
    impl WorkerSpec for FailingTick {
        async fn tick(&self) -> Result<(), ProcessError> {
            Err(ProcessError::failed("tick blew up"))
        }
    }

    #[tokio::test]
    async fn tick_error_halts_and_propagates() {
        let worker = Worker::new(Arc::new(FailingTick));
        worker
            .init(config_with_tick("1"), Arc::new(ServiceContainer::new()))
            .await
            .unwrap();

        let err = worker.start().await.unwrap_err();
        assert_eq!(err, ProcessError::failed("tick blew up"));
        assert!(worker.halted());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let worker = Worker::new(Arc::new(Counter {
            ticks: AtomicUsize::new(0),
        }));
        worker.stop().await.unwrap();
        worker.stop().await.unwrap();
        assert!(worker.halted());
    }
}
