// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Running accumulation over data payloads.
//!
//! The accumulator lives in the derived stream's own state and is shared by
//! all of its subscribers. Each `Data(v)` replaces it with `f(&acc, &v)`
//! and emits the new value. Errors pass through and leave it untouched.

use crate::stream::Stream;
use estream_core::Payload;
use parking_lot::Mutex;
use std::sync::Arc;

/// Extension trait providing `scan` and `try_scan`.
pub trait ScanExt<T, E, V> {
    /// Emits every intermediate accumulator value, starting from `seed`.
    ///
    /// ```
    /// use estream_stream::{ScanExt, Stream};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let numbers: Stream<i32> = Stream::new();
    /// let sums = numbers.scan(0i32, |acc, value| acc + value);
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// sums.on_data(move |sum, _| sink.lock().unwrap().push(*sum));
    ///
    /// for value in [1, 2, 3] {
    ///     numbers.push(value);
    /// }
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 3, 6]);
    /// ```
    fn scan<A, F>(&self, seed: A, f: F) -> Stream<A, E, V>
    where
        A: Payload,
        F: Fn(&A, &T) -> A + Send + Sync + 'static;

    /// Like [`scan`](Self::scan); an `Err` is sent downstream and the accumulator is kept.
    fn try_scan<A, F>(&self, seed: A, f: F) -> Stream<A, E, V>
    where
        A: Payload,
        F: Fn(&A, &T) -> Result<A, E> + Send + Sync + 'static;
}

impl<T: Payload, E: Payload, V: Payload> ScanExt<T, E, V> for Stream<T, E, V> {
    fn scan<A, F>(&self, seed: A, f: F) -> Stream<A, E, V>
    where
        A: Payload,
        F: Fn(&A, &T) -> A + Send + Sync + 'static,
    {
        self.try_scan(seed, move |acc, value| Ok(f(acc, value)))
    }

    fn try_scan<A, F>(&self, seed: A, f: F) -> Stream<A, E, V>
    where
        A: Payload,
        F: Fn(&A, &T) -> Result<A, E> + Send + Sync + 'static,
    {
        let acc = Arc::new(Mutex::new(seed));
        self.derive(move |event, downstream| {
            let Some(value) = downstream.relay(event) else {
                return;
            };
            let next = {
                let mut acc = acc.lock();
                f(&*acc, value).map(|next| {
                    *acc = next.clone();
                    next
                })
            };
            match next {
                Ok(next) => downstream.push(next),
                Err(error) => downstream.error(error),
            }
        })
    }
}
