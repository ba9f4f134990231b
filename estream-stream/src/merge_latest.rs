// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Merging several streams into rounds of one value per source.
//!
//! A round completes once every source has produced at least one `Data`
//! value since the previous round. A source that emits again before the
//! round completes replaces its earlier value in place. The completed round
//! is emitted as `Vec<(StreamId, T)>` in the order sources first reported,
//! and a new round begins. Errors pass through and the merged stream ends
//! when all sources have ended.
//!
//! # Examples
//!
//! ```
//! use estream_stream::{MergeLatestExt, Stream};
//! use std::sync::{Arc, Mutex};
//!
//! let temperature: Stream<i32> = Stream::new();
//! let humidity: Stream<i32> = Stream::new();
//! let readings = temperature.merge_latest([&humidity]);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! readings.on_data(move |round, _| {
//!     sink.lock().unwrap().push(round.iter().map(|(_, v)| *v).collect::<Vec<_>>())
//! });
//!
//! temperature.push(20);
//! temperature.push(21);
//! humidity.push(40);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![vec![21, 40]]);
//! ```

use crate::stream::{Stream};
use core::mem;
use estream_core::{Payload, StreamId, StreamOptions};
use parking_lot::Mutex;
use std::sync::Arc;

/// Builds a stream that emits one value from every source per round.
///
/// See the [module-level documentation](mod@crate::merge_latest) for details.
pub fn merge_latest<'a, T, E, V, I>(sources: I) -> Stream<Vec<(StreamId, T)>, E, V>
where
    T: Payload,
    E: Payload,
    V: Payload,
    I: IntoIterator<Item = &'a Stream<T, E, V>>,
{
    let sources: Vec<&Stream<T, E, V>> = sources.into_iter().collect();
    let scheduler = sources
        .first()
        .map_or_else(estream_runtime::ambient_scheduler, |first| first.inner_scheduler());
    let merged = Stream::from_parts(StreamOptions::default(), scheduler, None);

    let mut ids: Vec<StreamId> = sources.iter().map(|source| source.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    let expected = ids.len();

    let round: Arc<Mutex<Vec<(StreamId, T)>>> = Arc::new(Mutex::new(Vec::with_capacity(expected)));
    for source in sources.iter().copied() {
        let round = Arc::clone(&round);
        merged.connect(source, move |event, downstream| {
            let Some(value) = downstream.relay(event) else {
                return;
            };
            let parent = downstream.parent();
            let complete = {
                let mut round = round.lock();
                match round.iter_mut().find(|(id, _)| *id == parent) {
                    Some(slot) => slot.1 = value.clone(),
                    None => round.push((parent, value.clone())),
                }
                (round.len() == expected).then(|| mem::take(&mut *round))
            };
            if let Some(values) = complete {
                downstream.push(values);
            }
        });
    }
    if !sources.is_empty() {
        merged.end_if_orphaned();
    }
    merged
}

/// Extension trait providing `merge_latest` on a stream.
pub trait MergeLatestExt<T, E, V> {
    /// [`merge_latest`](fn@crate::merge_latest) of this stream followed by `others`.
    fn merge_latest<'a, I>(&'a self, others: I) -> Stream<Vec<(StreamId, T)>, E, V>
    where
        I: IntoIterator<Item = &'a Stream<T, E, V>>,
        T: 'a,
        E: 'a,
        V: 'a;
}

impl<T: Payload, E: Payload, V: Payload> MergeLatestExt<T, E, V> for Stream<T, E, V> {
    fn merge_latest<'a, I>(&'a self, others: I) -> Stream<Vec<(StreamId, T)>, E, V>
    where
        I: IntoIterator<Item = &'a Stream<T, E, V>>,
        T: 'a,
        E: 'a,
        V: 'a,
    {
        merge_latest(core::iter::once(self).chain(others))
    }
}
