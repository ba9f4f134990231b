// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A scheduler pumped explicitly by the host.
//!
//! Suited to programs with their own main loop (games, UIs, simulations) and
//! to deterministic tests: nothing runs until [`ManualScheduler::run_until_idle`]
//! or [`ManualScheduler::advance`] is called, and time only moves on `advance`.

use crate::scheduler::{Scheduler, Task, TaskHandle};
use core::fmt;
use core::time::Duration;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// Upper bound on tasks run by one `run_until_idle` call, so self-rescheduling
/// tasks cannot spin forever.
const MAX_TASKS_PER_RUN: usize = 10_000;

struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

struct ManualState {
    origin: Instant,
    elapsed: Duration,
    ready: VecDeque<Task>,
    timers: Vec<Timer>,
    next_seq: u64,
}

/// Host-driven task queue with a virtual clock.
///
/// ```
/// use estream_runtime::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let runs = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&runs);
/// scheduler.delay(Duration::from_millis(10), Box::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// scheduler.advance(Duration::from_millis(9));
/// assert_eq!(runs.load(Ordering::SeqCst), 0);
/// scheduler.advance(Duration::from_millis(1));
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                ready: VecDeque::new(),
                timers: Vec::new(),
                next_seq: 0,
            })),
        }
    }

    /// Runs deferred tasks, including ones they defer in turn, until none are left.
    ///
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while ran < MAX_TASKS_PER_RUN {
            // The lock is released before the task runs; tasks may schedule more work.
            let Some(task) = self.state.lock().ready.pop_front() else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    /// Moves the virtual clock forward, firing due timers in due order.
    ///
    /// Deferred tasks are drained after every timer, so work a timer defers
    /// observes the clock at that timer's due time.
    pub fn advance(&self, duration: Duration) -> usize {
        let target = self.state.lock().elapsed + duration;
        let mut ran = self.run_until_idle();
        while let Some(timer) = self.pop_due(target) {
            (timer.task)();
            ran += 1 + self.run_until_idle();
        }
        self.state.lock().elapsed = target;
        ran + self.run_until_idle()
    }

    pub fn pending_tasks(&self) -> usize {
        self.state.lock().ready.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.lock().timers.len()
    }

    fn pop_due(&self, target: Duration) -> Option<Timer> {
        let mut state = self.state.lock();
        let index = state
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= target)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;
        let timer = state.timers.swap_remove(index);
        state.elapsed = state.elapsed.max(timer.due);
        Some(timer)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("elapsed", &state.elapsed)
            .field("ready", &state.ready.len())
            .field("timers", &state.timers.len())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        self.state.lock().ready.push_back(handle.guard(task));
        handle
    }

    fn delay(&self, duration: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.elapsed + duration;
        state.timers.push(Timer {
            due,
            seq,
            task: handle.guard(task),
        });
        handle
    }

    fn now(&self) -> Instant {
        let state = self.state.lock();
        state.origin + state.elapsed
    }
}
