// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # estream
//!
//! Push-based reactive event streams.
//!
//! ## Overview
//!
//! A [`Stream`] pushes `Data`, `Error` and `End` events to its subscribers
//! synchronously. Streams derived through the operators form a graph: a
//! stream fed by several parents ends only once all of them have ended and
//! carries their end values in the order they arrived. Producer-backed
//! streams start on their first subscriber and stop after their last one.
//!
//! This crate re-exports the workspace crates:
//!
//! - `estream-core`: the event model, options and errors
//! - `estream-runtime`: the [`Scheduler`] abstraction
//! - `estream-stream`: the stream core and synchronous operators
//! - `estream-stream-time`: `debounce` and history `replay`
//!
//! ## Quick Start
//!
//! ```rust
//! use estream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let orders: Stream<u32> = Stream::new();
//! let refunds: Stream<u32> = Stream::new();
//! let ledger = orders.add_sources([&refunds]);
//!
//! let totals = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&totals);
//! ledger
//!     .scan(0u32, |total, amount| total + amount)
//!     .on_data(move |total, _| sink.lock().unwrap().push(*total));
//!
//! orders.push(40);
//! refunds.push(15);
//! orders.end_with(1);
//! refunds.end_with(2);
//!
//! assert_eq!(*totals.lock().unwrap(), vec![40, 55]);
//! assert!(ledger.is_ended());
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[cfg(feature = "runtime-tokio")]
pub mod channel_ext;
pub mod prelude;

#[cfg(feature = "runtime-tokio")]
pub use channel_ext::ReceiverExt;

pub use estream_core::{
    EndValues, EstreamError, Event, EventKind, IntoEstreamError, Payload, Recorded, Result,
    ResultExt, StreamId, StreamOptions,
};
pub use estream_runtime::{ManualScheduler, Scheduler, Task, TaskHandle};
#[cfg(feature = "runtime-tokio")]
pub use estream_runtime::TokioScheduler;
pub use estream_stream::{
    merge_latest, BatchByCountExt, Downstream, Emission, EndOnErrorExt, EventStream, FillExt,
    FilterExt, FmapExt, IntoAsyncStream, MapExt, MergeLatestExt, Producer, ReduceExt, ScanExt,
    Sink, Stream, Subscriber, Subscription, TakeExt, TakeUntilExt,
};
pub use estream_stream_time::{DebounceExt, ReplayExt, ReplayHandle};
