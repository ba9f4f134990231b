// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stream::Stream;
use estream_core::Payload;

/// Extension trait providing `fmap` for streams of collections.
pub trait FmapExt<T, E, V> {
    /// Maps `f` over every element of each `Data(Vec<T>)`.
    ///
    /// ```
    /// use estream_stream::{FmapExt, Stream};
    ///
    /// let batches: Stream<Vec<i32>> = Stream::new();
    /// let incremented = batches.fmap(|value| value + 1);
    ///
    /// incremented.on_data(|batch, _| assert_eq!(*batch, vec![2, 2, 2]));
    /// batches.push(vec![1, 1, 1]);
    /// ```
    fn fmap<U, F>(&self, f: F) -> Stream<Vec<U>, E, V>
    where
        U: Payload,
        F: Fn(&T) -> U + Send + Sync + 'static;
}

impl<T: Payload, E: Payload, V: Payload> FmapExt<T, E, V> for Stream<Vec<T>, E, V> {
    fn fmap<U, F>(&self, f: F) -> Stream<Vec<U>, E, V>
    where
        U: Payload,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.derive(move |event, downstream| {
            if let Some(values) = downstream.relay(event) {
                downstream.push(values.iter().map(&f).collect());
            }
        })
    }
}
