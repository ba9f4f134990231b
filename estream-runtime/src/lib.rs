// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Where estream's asynchronous work runs.
//!
//! Dispatch itself is always synchronous. Only three things are scheduled:
//! lazy producer start/stop, debounce timers and replay pacing. They go
//! through the [`Scheduler`](scheduler::Scheduler) trait so the host decides
//! which task queue drives them.

pub mod impls;
pub mod scheduler;

pub use scheduler::{Scheduler, Task, TaskHandle};

#[cfg(feature = "runtime-tokio")]
pub use impls::tokio::TokioScheduler;
pub use impls::manual::ManualScheduler;

/// Scheduler used by constructors that are not handed one explicitly.
#[cfg(feature = "runtime-tokio")]
pub type DefaultScheduler = TokioScheduler;

/// Returns a shared handle to the [`DefaultScheduler`].
#[cfg(feature = "runtime-tokio")]
#[must_use]
pub fn default_scheduler() -> std::sync::Arc<dyn Scheduler> {
    std::sync::Arc::new(DefaultScheduler::default())
}

/// The scheduler picked up by streams built without an explicit one.
///
/// This is the [`DefaultScheduler`] when a Tokio runtime is current on the
/// calling thread, and `None` otherwise. Timer-driven operators fall back to
/// their undelayed behaviour on a stream without a scheduler.
#[cfg(feature = "runtime-tokio")]
#[must_use]
pub fn ambient_scheduler() -> Option<std::sync::Arc<dyn Scheduler>> {
    TokioScheduler::is_available().then(default_scheduler)
}

/// The scheduler picked up by streams built without an explicit one.
///
/// Always `None` without the `runtime-tokio` feature.
#[cfg(not(feature = "runtime-tokio"))]
#[must_use]
pub const fn ambient_scheduler() -> Option<std::sync::Arc<dyn Scheduler>> {
    None
}
