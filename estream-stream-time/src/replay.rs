// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Re-delivering a stream's history to its current subscribers.
//!
//! The first retained event is delivered on the scheduler's next turn. Each
//! following one comes after a fixed `interval`, or after the gap recorded
//! between the two original dispatches when no interval is given. Replayed
//! events are not recorded again, a replayed `End` does not end anything,
//! and a producer is never started by a replay.
//!
//! ```rust
//! use estream_runtime::ManualScheduler;
//! use estream_stream::{Stream, StreamOptions};
//! use estream_stream_time::ReplayExt;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = ManualScheduler::new();
//! let log: Stream<i32> = Stream::with_scheduler(StreamOptions::new().history(8), Arc::new(scheduler.clone()));
//! log.push(1);
//! log.push(2);
//! log.end();
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! log.on(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let replay = log.replay(Some(Duration::from_millis(10)), 0).unwrap();
//! scheduler.advance(Duration::from_millis(20));
//!
//! assert_eq!(seen.load(Ordering::SeqCst), 3);
//! assert!(replay.is_finished());
//! ```

use crate::timer_source;
use core::fmt;
use estream_core::logging::{debug, warn};
use estream_core::{EstreamError, Payload, Recorded, Result};
use estream_runtime::{Scheduler, Task, TaskHandle};
use estream_stream::Stream;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Progress {
    total: usize,
    delivered: usize,
    finished: bool,
    cancelled: bool,
    timer: Option<TaskHandle>,
}

/// Observes and cancels a running replay.
#[derive(Clone, Default)]
pub struct ReplayHandle {
    progress: Arc<Mutex<Progress>>,
}

impl ReplayHandle {
    fn new(total: usize) -> Self {
        Self {
            progress: Arc::new(Mutex::new(Progress {
                total,
                finished: total == 0,
                ..Progress::default()
            })),
        }
    }

    /// Stops the replay before its next event. Idempotent.
    pub fn cancel(&self) {
        let timer = {
            let mut progress = self.progress.lock();
            progress.cancelled = true;
            progress.timer.take()
        };
        if let Some(timer) = timer {
            timer.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.progress.lock().cancelled
    }

    /// `true` once every selected event has been delivered.
    pub fn is_finished(&self) -> bool {
        self.progress.lock().finished
    }

    pub fn delivered(&self) -> usize {
        self.progress.lock().delivered
    }

    /// Number of history entries selected for the replay.
    pub fn total(&self) -> usize {
        self.progress.lock().total
    }

    fn track(&self, timer: TaskHandle) {
        let mut progress = self.progress.lock();
        if progress.cancelled {
            drop(progress);
            timer.cancel();
        } else {
            progress.timer = Some(timer);
        }
    }
}

impl fmt::Debug for ReplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = self.progress.lock();
        f.debug_struct("ReplayHandle")
            .field("total", &progress.total)
            .field("delivered", &progress.delivered)
            .field("finished", &progress.finished)
            .field("cancelled", &progress.cancelled)
            .finish()
    }
}

/// Extension trait providing `replay`.
pub trait ReplayExt<T, E, V> {
    /// Re-delivers the retained history from position `start` to the
    /// current subscribers.
    ///
    /// `interval` fixes the spacing between events; `None` reproduces the
    /// recorded spacing.
    ///
    /// # Errors
    ///
    /// [`EstreamError::HistoryDisabled`] if the stream keeps no history, and
    /// [`EstreamError::StreamProcessingError`] if there is no scheduler to pace it.
    fn replay(&self, interval: Option<Duration>, start: usize) -> Result<ReplayHandle>;
}

impl<T: Payload, E: Payload, V: Payload> ReplayExt<T, E, V> for Stream<T, E, V> {
    fn replay(&self, interval: Option<Duration>, start: usize) -> Result<ReplayHandle> {
        if !self.options().keeps_history() {
            warn!("{}: replay requested without history", self.id());
            return Err(EstreamError::HistoryDisabled { stream: self.id() });
        }
        let Some(scheduler) = timer_source(self) else {
            warn!("{}: replay requested without a scheduler", self.id());
            return Err(EstreamError::stream_error(format!(
                "no scheduler to pace the replay of {}",
                self.id()
            )));
        };

        let records = self.history_records(start);
        let handle = ReplayHandle::new(records.len());
        debug!("{}: replaying {} events", self.id(), records.len());
        if records.is_empty() {
            return Ok(handle);
        }

        let replay = Arc::new(Replay {
            stream: self.clone(),
            records,
            interval,
            scheduler,
            handle: handle.clone(),
        });
        replay.schedule(0, None);
        Ok(handle)
    }
}

struct Replay<T, E, V> {
    stream: Stream<T, E, V>,
    records: Vec<Recorded<T, E, V>>,
    interval: Option<Duration>,
    scheduler: Arc<dyn Scheduler>,
    handle: ReplayHandle,
}

impl<T: Payload, E: Payload, V: Payload> Replay<T, E, V> {
    fn schedule(self: &Arc<Self>, index: usize, gap: Option<Duration>) {
        let this = Arc::clone(self);
        let task: Task = Box::new(move || this.step(index));
        let timer = match gap {
            None => self.scheduler.defer(task),
            Some(gap) => self.scheduler.delay(gap, task),
        };
        self.handle.track(timer);
    }

    fn step(self: Arc<Self>, index: usize) {
        if self.handle.is_cancelled() {
            return;
        }
        let Some(record) = self.records.get(index) else {
            return;
        };
        self.stream.redeliver(&record.event);

        let next = index + 1;
        let finished = {
            let mut progress = self.handle.progress.lock();
            progress.delivered += 1;
            progress.timer = None;
            progress.finished = next >= self.records.len();
            progress.finished
        };
        if finished {
            return;
        }

        let gap = self.interval.unwrap_or_else(|| {
            self.records[next]
                .at
                .saturating_duration_since(record.at)
        });
        self.schedule(next, Some(gap));
    }
}
