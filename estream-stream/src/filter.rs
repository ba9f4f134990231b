// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Dropping data payloads, or whole events, by predicate.

use crate::stream::Stream;
use estream_core::{Event, Payload};

/// Extension trait providing `filter`, `try_filter` and `filter_event`.
pub trait FilterExt<T, E, V> {
    /// Forwards `Data(v)` only when `predicate(&v)` holds. Errors and the end pass through.
    fn filter<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static;

    /// Like [`filter`](Self::filter); an `Err` from the predicate becomes an `Error` event.
    fn try_filter<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static;

    /// Forwards whole events, of any kind, for which `predicate` holds.
    ///
    /// Filtering out the parent's `End` leaves the derived stream open.
    fn filter_event<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&Event<T, E, V>) -> bool + Send + Sync + 'static;
}

impl<T: Payload, E: Payload, V: Payload> FilterExt<T, E, V> for Stream<T, E, V> {
    fn filter<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_filter(move |value| Ok(predicate(value)))
    }

    fn try_filter<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    {
        self.derive(move |event, downstream| {
            if let Some(value) = downstream.relay(event) {
                match predicate(value) {
                    Ok(true) => downstream.push(value.clone()),
                    Ok(false) => {}
                    Err(error) => downstream.error(error),
                }
            }
        })
    }

    fn filter_event<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&Event<T, E, V>) -> bool + Send + Sync + 'static,
    {
        self.derive(move |event, downstream| {
            if !predicate(event) {
                return;
            }
            match event {
                Event::End(values) => downstream.parent_ended(values.clone()),
                other => downstream.emit(other.clone()),
            }
        })
    }
}
