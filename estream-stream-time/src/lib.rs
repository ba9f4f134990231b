// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Timer-driven operators for estream streams.
//!
//! - **[`DebounceExt`]** - `.debounce(duration)` forwards a value once the source
//!   has been quiet for `duration`
//! - **[`ReplayExt`]** - `.replay(interval, start)` re-delivers a stream's history
//!   to its current subscribers, paced by a fixed interval or the recorded cadence
//!
//! Timers come from the stream's [`Scheduler`](estream_runtime::Scheduler). Streams
//! built without one use the Tokio scheduler if a Tokio runtime is current
//! when the operator is applied and the `runtime-tokio` feature is enabled
//! (the default). Otherwise `debounce` forwards values undelayed and `replay`
//! returns an error.
//!
//! # Example
//!
//! ```rust
//! use estream_runtime::ManualScheduler;
//! use estream_stream::{Stream, StreamOptions};
//! use estream_stream_time::prelude::*;
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! let scheduler = ManualScheduler::new();
//! let keys: Stream<char> = Stream::with_scheduler(StreamOptions::new(), Arc::new(scheduler.clone()));
//! let settled = keys.debounce(Duration::from_millis(300));
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! settled.on_data(move |key, _| sink.lock().unwrap().push(*key));
//!
//! keys.push('r');
//! keys.push('u');
//! keys.push('s');
//! scheduler.advance(Duration::from_millis(300));
//!
//! assert_eq!(*seen.lock().unwrap(), vec!['s']);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod debounce;
pub mod prelude;
pub mod replay;

pub use debounce::DebounceExt;
pub use replay::{ReplayExt, ReplayHandle};

use estream_core::Payload;
use estream_runtime::Scheduler;
use estream_stream::Stream;
use std::sync::Arc;

/// The scheduler timers for `stream` run on.
pub(crate) fn timer_source<T, E, V>(stream: &Stream<T, E, V>) -> Option<Arc<dyn Scheduler>>
where
    T: Payload,
    E: Payload,
    V: Payload,
{
    stream
        .scheduler()
        .cloned()
        .or_else(estream_runtime::ambient_scheduler)
}
