//! Runtime core: orchestration and lifecycle.
//!
//! The public API re-exported from here is [`Runner`] and [`ErrorStream`];
//! everything else is an internal building block the runner wires together.
//!
//! ## Files & responsibilities
//! - **runner.rs**: public facade; owns the registration cell, the shutdown
//!   latch and the container handle; builds the event bus and subscriber
//!   fan-out; spawns the phase driver; exposes `shutdown` / `shutdown_on_signal`.
//! - **registry.rs**: registration storage; computes the ascending tier list
//!   (registration order preserved within a tier) at `run` entry.
//! - **driver.rs**: the sequential state machine — initializer phase, per-tier
//!   init/start sub-phases with the invocation barrier, the supervision loop
//!   classifying completions, the post-cascade drain and the single stream
//!   close.
//! - **cascade.rs**: reverse-tier mass stop with per-tier join barriers and
//!   stop-error collection.
//! - **stream.rs**: the bounded, closeable error conduit (`ErrorStream` /
//!   `ErrorSink`).
//! - **shutdown.rs**: cross-platform OS signal handling behind
//!   `Runner::shutdown_on_signal`.
//!
//! ## Wiring (module-level flow)
//! ```text
//! Application code
//!   └─ registers units, calls Runner::run(config, subscribers) → ErrorStream
//!
//! Runner::run()
//!   ├─ SubscriberSet + event forwarder (Bus → per-subscriber queues)
//!   ├─ container.set_default(Bus)            (sentinel slot for units)
//!   └─ spawn Driver::run()
//!
//! Driver::run()
//!   ├─ initializer phase (serial)
//!   ├─ per tier: init serially → spawn start tasks → invocation barrier
//!   ├─ supervise: select { completion conduit, shutdown token }
//!   ├─ cascade::run(started tiers, reverse order)        [unless all benign]
//!   ├─ drain completion conduit (late errors still emitted)
//!   └─ publish Halted, drop ErrorSink → stream closes
//! ```
//!
//! ## Shutdown timeline
//! ```text
//! fatal completion / Runner::shutdown() / OS signal
//!   → cascade: per tier (highest first): concurrent stops, join, emit errors
//!   → drain start-task completions
//!   → Halted → stream close
//! ```

mod cascade;
mod driver;
mod registry;
mod runner;
mod shutdown;
mod stream;

pub use runner::Runner;
pub use stream::ErrorStream;
