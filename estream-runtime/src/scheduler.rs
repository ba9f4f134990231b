// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Debug;
use core::time::Duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A task queue owned by the host program.
///
/// Implementations must never run a task synchronously from inside
/// [`defer`](Scheduler::defer) or [`delay`](Scheduler::delay) unless no queue
/// is available at all; callers rely on the deferral to coalesce work issued
/// in the same turn.
pub trait Scheduler: Send + Sync + Debug + 'static {
    /// Runs `task` on a later turn of the queue.
    fn defer(&self, task: Task) -> TaskHandle;

    /// Runs `task` once `duration` has elapsed.
    fn delay(&self, duration: Duration, task: Task) -> TaskHandle;

    /// The scheduler's notion of the current time.
    fn now(&self) -> Instant;
}

/// Cancellation handle for a scheduled task.
///
/// Cancelling is idempotent and racing a task that already started is safe:
/// the task simply completes. Dropping the handle does not cancel the task.
#[derive(Clone)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl TaskHandle {
    /// Creates a handle whose flag the scheduler checks before running the task.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            abort: None,
        }
    }

    /// Attaches a hook that releases runtime resources (timers, task slots) on cancel.
    #[must_use]
    pub fn with_abort(mut self, abort: impl Fn() + Send + Sync + 'static) -> Self {
        self.abort = Some(Arc::new(abort));
        self
    }

    /// A handle for a task that will never run.
    #[must_use]
    pub fn inert() -> Self {
        let handle = Self::new();
        handle.cancelled.store(true, Ordering::Release);
        handle
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            if let Some(abort) = &self.abort {
                abort();
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Wraps `task` so it becomes a no-op once this handle is cancelled.
    #[must_use]
    pub fn guard(&self, task: Task) -> Task {
        let cancelled = Arc::clone(&self.cancelled);
        Box::new(move || {
            if !cancelled.load(Ordering::Acquire) {
                task();
            }
        })
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for TaskHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
