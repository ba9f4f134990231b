// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::scheduler::{Scheduler, Task, TaskHandle};
use core::time::Duration;
use estream_core::logging::warn;
use std::time::Instant;
use tokio::runtime::Handle;

/// Runs estream tasks on the Tokio runtime that is current at scheduling time.
///
/// Deferred tasks are spawned, so they run once the scheduling task yields.
/// Outside a runtime a deferred task runs inline and a delayed task is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Whether a Tokio runtime is current on the calling thread.
    #[must_use]
    pub fn is_available() -> bool {
        Handle::try_current().is_ok()
    }
}

impl Scheduler for TokioScheduler {
    fn defer(&self, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let task = handle.guard(task);
        match Handle::try_current() {
            Ok(runtime) => {
                let abort = runtime.spawn(async move { task() }).abort_handle();
                handle.with_abort(move || abort.abort())
            }
            Err(_) => {
                warn!("no Tokio runtime is current; running deferred task inline");
                task();
                handle
            }
        }
    }

    fn delay(&self, duration: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let task = handle.guard(task);
        match Handle::try_current() {
            Ok(runtime) => {
                // The deadline is fixed now, not when the spawned task is first polled.
                let sleep = tokio::time::sleep(duration);
                let abort = runtime
                    .spawn(async move {
                        sleep.await;
                        task();
                    })
                    .abort_handle();
                handle.with_abort(move || abort.abort())
            }
            Err(_) => {
                warn!("no Tokio runtime is current; dropping task delayed by {duration:?}");
                TaskHandle::inert()
            }
        }
    }

    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}
