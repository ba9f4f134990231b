// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push-based event streams.
//!
//! A [`Stream`] delivers every event to its current subscribers
//! synchronously, in subscription order, from inside the call that produced
//! it. Events are `Data`, `Error` or a terminal `End` carrying zero or more
//! end values. Errors never terminate a stream on their own.
//!
//! # Architecture
//!
//! - **[`Stream`]**: cheap-to-clone handle; producing, subscribing and history
//! - **Fan-in**: a stream wired to several parents ends only when all of them have ended
//! - **[`Producer`]**: lazily started on the first subscriber, stopped after the last one leaves
//! - **Extension traits**: each operator is a trait over [`Stream`] built on [`Stream::derive`]
//!
//! ## Operators
//!
//! - **[`map`](MapExt::map)** / **[`try_map`](MapExt::try_map)**: transform data
//! - **[`scan`](ScanExt::scan)**: running accumulation, one output per input
//! - **[`filter`](FilterExt::filter)** / **[`filter_event`](FilterExt::filter_event)**: drop data or whole events
//! - **[`fmap`](FmapExt::fmap)**: map inside `Vec` payloads
//! - **[`take`](TakeExt::take)**: first `n` data values, then end
//! - **[`take_until`](TakeUntilExt::take_until)** / **[`take_until_stream`](TakeUntilExt::take_until_stream)**: end on a condition or on another stream
//! - **[`end_on_error`](EndOnErrorExt::end_on_error)**: end after the first error
//! - **[`reduce`](ReduceExt::reduce)**: fold into a single end value
//! - **[`batch_by_count`](BatchByCountExt::batch_by_count)**: fixed-size groups
//! - **[`fill`](FillExt::fill)**: call a function with every `n` consecutive values
//! - **[`merge_latest`](fn@merge_latest)**: one value from every source per round
//! - **[`into_async_stream`](IntoAsyncStream::into_async_stream)**: pull the events as a [`futures::Stream`]
//!
//! Time-based operators live in `estream-stream-time`.
//!
//! # Example
//!
//! ```
//! use estream_stream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let readings: Stream<i32> = Stream::new();
//! let alerts = readings.filter(|value| *value > 100).map(|value| format!("high: {value}"));
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! alerts.on_data(move |alert, _| sink.lock().unwrap().push(alert.clone()));
//!
//! readings.push(42);
//! readings.push(130);
//! readings.end();
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["high: 130".to_string()]);
//! assert!(alerts.is_ended());
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod batch_by_count;
pub mod downstream;
pub mod emission;
pub mod end_on_error;
pub mod fan_in;
pub mod fill;
pub mod filter;
pub mod fmap;
pub mod into_async_stream;
pub mod lifecycle;
pub mod map;
pub mod merge_latest;
pub mod prelude;
pub mod reduce;
pub mod scan;
pub mod stream;
pub mod subscription;
pub mod take;
pub mod take_until;

pub use batch_by_count::BatchByCountExt;
pub use downstream::Downstream;
pub use emission::Emission;
pub use end_on_error::EndOnErrorExt;
pub use fill::FillExt;
pub use filter::FilterExt;
pub use fmap::FmapExt;
pub use into_async_stream::{EventStream, IntoAsyncStream};
pub use lifecycle::{Producer, Sink};
pub use map::MapExt;
pub use merge_latest::{merge_latest, MergeLatestExt};
pub use reduce::ReduceExt;
pub use scan::ScanExt;
pub use stream::{Stream, Subscriber};
pub use subscription::Subscription;
pub use take::TakeExt;
pub use take_until::TakeUntilExt;

pub use estream_core::{
    EndValues, EstreamError, Event, EventKind, Payload, Recorded, Result, StreamId,
    StreamOptions,
};
pub use estream_runtime::{ManualScheduler, Scheduler, TaskHandle};
