//! # The error stream.
//!
//! [`ErrorStream`] is the runner's sole output: a bounded, closeable conduit
//! of [`RunnerError`] values. The driver emits errors in observation order
//! and closes the stream exactly once, when the run is fully over; a closed
//! stream with no values is a clean shutdown.
//!
//! [`ErrorSink`] is the internal producer half. Sends suspend when the
//! consumer lags behind the bound, so callers are expected to drain the
//! stream until it closes.

use tokio::sync::mpsc;

use crate::error::RunnerError;

/// Buffered capacity of the stream between the driver and the consumer.
const STREAM_CAPACITY: usize = 64;

/// Consumer half: yields runner errors until the run is over.
pub struct ErrorStream {
    rx: mpsc::Receiver<RunnerError>,
}

impl ErrorStream {
    /// Receives the next error; `None` means the stream is closed and the
    /// runner has fully stopped.
    pub async fn recv(&mut self) -> Option<RunnerError> {
        self.rx.recv().await
    }

    /// Drains the stream to completion, collecting every emitted error.
    pub async fn drain(mut self) -> Vec<RunnerError> {
        let mut errors = Vec::new();
        while let Some(err) = self.recv().await {
            errors.push(err);
        }
        errors
    }
}

/// Producer half, owned by the phase driver.
#[derive(Clone)]
pub(crate) struct ErrorSink {
    tx: mpsc::Sender<RunnerError>,
}

impl ErrorSink {
    /// Emits an error onto the stream.
    ///
    /// A consumer that dropped the stream is not an error: the run still has
    /// to finish its cascade, so the value is discarded.
    pub(crate) async fn emit(&self, err: RunnerError) {
        let _ = self.tx.send(err).await;
    }
}

/// Creates a connected sink/stream pair.
pub(crate) fn channel() -> (ErrorSink, ErrorStream) {
    let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
    (ErrorSink { tx }, ErrorStream { rx })
}
