// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Folding a whole stream into one value delivered with its end.

use crate::stream::Stream;
use estream_core::{EndValues, Event, Payload};
use parking_lot::Mutex;
use std::sync::Arc;

/// Extension trait providing `reduce`.
///
/// Available on streams whose end values share the data type, since the
/// parent's end values are folded into the result as well.
pub trait ReduceExt<T, E> {
    /// Accumulates every `Data` value, then on the parent's end folds its
    /// end values in too and ends with `End([result])`.
    ///
    /// Errors are forwarded and do not interrupt the accumulation.
    ///
    /// ```
    /// use estream_stream::{ReduceExt, Stream};
    ///
    /// let numbers: Stream<i32> = Stream::new();
    /// let total = numbers.reduce(0i32, |acc, value| acc + value);
    /// total.on_end(|values, _| assert_eq!(values.to_vec(), vec![10]));
    ///
    /// numbers.push(1);
    /// numbers.push(2);
    /// numbers.end_with(7);
    /// ```
    fn reduce<A, F>(&self, seed: A, f: F) -> Stream<A, E, A>
    where
        A: Payload,
        F: Fn(&A, &T) -> A + Send + Sync + 'static;
}

impl<T: Payload, E: Payload> ReduceExt<T, E> for Stream<T, E, T> {
    fn reduce<A, F>(&self, seed: A, f: F) -> Stream<A, E, A>
    where
        A: Payload,
        F: Fn(&A, &T) -> A + Send + Sync + 'static,
    {
        let acc = Arc::new(Mutex::new(seed));
        self.derive(move |event, downstream| match event {
            Event::Data(value) => {
                let mut acc = acc.lock();
                let next = f(&*acc, value);
                *acc = next;
            }
            Event::Error(error) => downstream.error(error.clone()),
            Event::End(values) => {
                let result = {
                    let mut acc = acc.lock();
                    for value in values {
                        let next = f(&*acc, value);
                        *acc = next;
                    }
                    acc.clone()
                };
                downstream.parent_ended(EndValues::single(result));
            }
        })
    }
}
