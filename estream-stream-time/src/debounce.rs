// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Debounce operator: forwards a value only after the source has been quiet.
//!
//! Every `Data` replaces the pending value and restarts the quiet-period
//! timer. When the timer fires the pending value is emitted. `Error` events
//! pass through immediately and leave the pending value and its timer alone.
//! When the source ends, a pending value is flushed before the `End`.
//!
//! # Examples
//!
//! ```rust
//! use estream_runtime::ManualScheduler;
//! use estream_stream::{Stream, StreamOptions};
//! use estream_stream_time::DebounceExt;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = ManualScheduler::new();
//! let searches: Stream<&str> = Stream::with_scheduler(StreamOptions::new(), Arc::new(scheduler.clone()));
//! let queries = searches.debounce(Duration::from_millis(100));
//! queries.on_data(|query, _| assert_eq!(*query, "rust"));
//!
//! searches.push("ru");
//! scheduler.advance(Duration::from_millis(60));
//! searches.push("rust");
//! scheduler.advance(Duration::from_millis(60));
//! // Quiet for only 60ms since "rust": nothing yet.
//! scheduler.advance(Duration::from_millis(40));
//! ```

use crate::timer_source;
use estream_core::logging::warn;
use estream_core::{Event, Payload};
use estream_runtime::{Scheduler, TaskHandle};
use estream_stream::Stream;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct Pending<T> {
    value: Option<T>,
    generation: u64,
    timer: Option<TaskHandle>,
}

impl<T> Pending<T> {
    const fn new() -> Self {
        Self {
            value: None,
            generation: 0,
            timer: None,
        }
    }

    /// Takes the pending value and cancels its timer.
    fn flush(&mut self) -> Option<T> {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.value.take()
    }
}

/// Extension trait providing the `debounce` operator.
pub trait DebounceExt<T, E, V> {
    /// Emits the latest value once `duration` passes without a new one.
    ///
    /// Without a scheduler (none given to the source, and no Tokio runtime
    /// current when `debounce` is called) values are forwarded immediately.
    ///
    /// See the [module-level documentation](crate::debounce) for details.
    fn debounce(&self, duration: Duration) -> Stream<T, E, V>;
}

impl<T: Payload, E: Payload, V: Payload> DebounceExt<T, E, V> for Stream<T, E, V> {
    fn debounce(&self, duration: Duration) -> Stream<T, E, V> {
        let Some(scheduler): Option<Arc<dyn Scheduler>> = timer_source(self) else {
            warn!("{}: no scheduler for debounce, forwarding values undelayed", self.id());
            return self.derive(|event, downstream| match event {
                Event::End(values) => downstream.parent_ended(values.clone()),
                other => downstream.emit(other.clone()),
            });
        };

        let pending = Arc::new(Mutex::new(Pending::new()));
        self.derive(move |event, downstream| match event {
            Event::Data(value) => {
                let target = downstream.stream().clone();
                let mut state = pending.lock();
                if let Some(timer) = state.timer.take() {
                    timer.cancel();
                }
                state.value = Some(value.clone());
                state.generation += 1;
                let generation = state.generation;
                let slot = Arc::clone(&pending);
                let timer = scheduler.delay(
                    duration,
                    Box::new(move || fire(&slot, generation, &target)),
                );
                state.timer = Some(timer);
            }
            Event::Error(error) => downstream.error(error.clone()),
            Event::End(values) => {
                let flushed = pending.lock().flush();
                if let Some(value) = flushed {
                    downstream.push(value);
                }
                downstream.parent_ended(values.clone());
            }
        })
    }
}

fn fire<T: Payload, E: Payload, V: Payload>(
    pending: &Mutex<Pending<T>>,
    generation: u64,
    target: &Stream<T, E, V>,
) {
    let value = {
        let mut state = pending.lock();
        if state.generation != generation {
            return;
        }
        state.timer = None;
        state.value.take()
    };
    if let Some(value) = value {
        target.push(value);
    }
}
