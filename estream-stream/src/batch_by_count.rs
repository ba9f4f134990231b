// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Grouping data payloads into fixed-size batches.
//!
//! Each time `count` values have been collected they are emitted as one
//! `Data(Vec<T>)` and the batch starts over. A partial batch left when the
//! parent ends is discarded. A count of zero behaves as one.

use crate::stream::Stream;
use estream_core::Payload;
use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;

/// Extension trait providing `batch_by_count`.
pub trait BatchByCountExt<T, E, V> {
    /// Emits every `count` data values as one batch.
    ///
    /// ```
    /// use estream_stream::{BatchByCountExt, Stream};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let numbers: Stream<i32> = Stream::new();
    /// let pairs = numbers.batch_by_count(2);
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// pairs.on_data(move |batch, _| sink.lock().unwrap().push(batch.clone()));
    ///
    /// for value in 1..=5 {
    ///     numbers.push(value);
    /// }
    /// assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2], vec![3, 4]]);
    /// ```
    fn batch_by_count(&self, count: usize) -> Stream<Vec<T>, E, V>;
}

impl<T: Payload, E: Payload, V: Payload> BatchByCountExt<T, E, V> for Stream<T, E, V> {
    fn batch_by_count(&self, count: usize) -> Stream<Vec<T>, E, V> {
        let size = count.max(1);
        let batch = Arc::new(Mutex::new(Vec::with_capacity(size)));
        self.derive(move |event, downstream| {
            let Some(value) = downstream.relay(event) else {
                return;
            };
            let full = {
                let mut batch = batch.lock();
                batch.push(value.clone());
                (batch.len() == size).then(|| mem::replace(&mut *batch, Vec::with_capacity(size)))
            };
            if let Some(full) = full {
                downstream.push(full);
            }
        })
    }
}
