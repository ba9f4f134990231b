// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Filling the arguments of a function from consecutive data values.
//!
//! `fill(arity, combine)` collects `arity` data values, calls `combine` with
//! them in arrival order, emits the result and starts collecting again.
//! Errors pass through without consuming an argument slot. Values still
//! waiting for their call when the parent ends are discarded. An arity of
//! zero behaves as one.

use crate::stream::Stream;
use estream_core::Payload;
use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;

/// Extension trait providing `fill`.
pub trait FillExt<T, E, V> {
    /// Emits `combine(values)` each time `arity` data values have arrived.
    ///
    /// # Arguments
    ///
    /// * `arity` - How many values one call of `combine` takes
    /// * `combine` - Builds the output from the collected values, oldest first
    ///
    /// # Returns
    ///
    /// A derived stream with one `Data` per `arity` parent values.
    ///
    /// # Examples
    ///
    /// ```
    /// use estream_stream::{FillExt, Stream};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let numbers: Stream<i32> = Stream::new();
    /// let sums = numbers.fill(3, |args| args.iter().sum::<i32>());
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// sums.on_data(move |sum, _| sink.lock().unwrap().push(*sum));
    ///
    /// for value in 1..=7 {
    ///     numbers.push(value);
    /// }
    /// assert_eq!(*seen.lock().unwrap(), vec![6, 15]);
    /// ```
    fn fill<U, F>(&self, arity: usize, combine: F) -> Stream<U, E, V>
    where
        U: Payload,
        F: Fn(&[T]) -> U + Send + Sync + 'static;
}

impl<T: Payload, E: Payload, V: Payload> FillExt<T, E, V> for Stream<T, E, V> {
    fn fill<U, F>(&self, arity: usize, combine: F) -> Stream<U, E, V>
    where
        U: Payload,
        F: Fn(&[T]) -> U + Send + Sync + 'static,
    {
        let arity = arity.max(1);
        let args = Arc::new(Mutex::new(Vec::with_capacity(arity)));
        self.derive(move |event, downstream| {
            let Some(value) = downstream.relay(event) else {
                return;
            };
            let filled = {
                let mut args = args.lock();
                args.push(value.clone());
                (args.len() == arity).then(|| mem::replace(&mut *args, Vec::with_capacity(arity)))
            };
            if let Some(filled) = filled {
                downstream.push(combine(&filled));
            }
        })
    }
}
