// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Transforms every data payload.
//!
//! `map` takes an infallible function: a panic inside it unwinds into the
//! caller of `push`. `try_map` takes a fallible one and sends each `Err`
//! downstream as an `Error` event instead.
//!
//! # Examples
//!
//! ```
//! use estream_stream::{EstreamError, Event, MapExt, Stream};
//! use std::sync::{Arc, Mutex};
//!
//! let raw: Stream<&str> = Stream::new();
//! let parsed = raw.try_map(|text| {
//!     text.parse::<i32>()
//!         .map_err(|_| EstreamError::stream_error(format!("not a number: {text}")))
//! });
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! parsed.on(move |emission| sink.lock().unwrap().push(emission.event().is_data()));
//!
//! raw.push("1");
//! raw.push("one");
//!
//! assert_eq!(*seen.lock().unwrap(), vec![true, false]);
//! ```

use crate::stream::Stream;
use estream_core::Payload;

/// Extension trait providing `map` and `try_map`.
pub trait MapExt<T, E, V> {
    /// Emits `Data(f(v))` for every `Data(v)`. Errors and the end pass through.
    fn map<U, F>(&self, f: F) -> Stream<U, E, V>
    where
        U: Payload,
        F: Fn(&T) -> U + Send + Sync + 'static;

    /// Like [`map`](Self::map), turning an `Err` from `f` into an `Error` event.
    fn try_map<U, F>(&self, f: F) -> Stream<U, E, V>
    where
        U: Payload,
        F: Fn(&T) -> Result<U, E> + Send + Sync + 'static;
}

impl<T: Payload, E: Payload, V: Payload> MapExt<T, E, V> for Stream<T, E, V> {
    fn map<U, F>(&self, f: F) -> Stream<U, E, V>
    where
        U: Payload,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.derive(move |event, downstream| {
            if let Some(value) = downstream.relay(event) {
                downstream.push(f(value));
            }
        })
    }

    fn try_map<U, F>(&self, f: F) -> Stream<U, E, V>
    where
        U: Payload,
        F: Fn(&T) -> Result<U, E> + Send + Sync + 'static,
    {
        self.derive(move |event, downstream| {
            if let Some(value) = downstream.relay(event) {
                match f(value) {
                    Ok(mapped) => downstream.push(mapped),
                    Err(error) => downstream.error(error),
                }
            }
        })
    }
}
