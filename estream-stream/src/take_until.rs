// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Forwarding everything until a condition is met.

use crate::stream::Stream;
use estream_core::{Event, EventKind, Payload};

/// Extension trait providing `take_until` and `take_until_stream`.
pub trait TakeUntilExt<T, E, V> {
    /// Forwards every event until `predicate` holds for one, forwards that
    /// event too, then ends and detaches from the parent.
    ///
    /// ```
    /// use estream_stream::{Event, Stream, TakeUntilExt};
    ///
    /// let numbers: Stream<i32> = Stream::new();
    /// let until_negative = numbers.take_until(|event| matches!(event, Event::Data(v) if *v < 0));
    ///
    /// numbers.push(3);
    /// numbers.push(-1);
    /// assert!(until_negative.is_ended());
    /// ```
    fn take_until<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&Event<T, E, V>) -> bool + Send + Sync + 'static;

    /// Forwards every event until `other` dispatches an event of `kind`, or
    /// any event when `kind` is `None`, then ends.
    fn take_until_stream<X, XE, XV>(
        &self,
        kind: Option<EventKind>,
        other: &Stream<X, XE, XV>,
    ) -> Stream<T, E, V>
    where
        X: Payload,
        XE: Payload,
        XV: Payload;
}

impl<T: Payload, E: Payload, V: Payload> TakeUntilExt<T, E, V> for Stream<T, E, V> {
    fn take_until<F>(&self, predicate: F) -> Stream<T, E, V>
    where
        F: Fn(&Event<T, E, V>) -> bool + Send + Sync + 'static,
    {
        self.derive(move |event, downstream| {
            let matched = predicate(event);
            match event {
                Event::End(values) => downstream.parent_ended(values.clone()),
                other => downstream.emit(other.clone()),
            }
            if matched {
                downstream.end();
            }
        })
    }

    fn take_until_stream<X, XE, XV>(
        &self,
        kind: Option<EventKind>,
        other: &Stream<X, XE, XV>,
    ) -> Stream<T, E, V>
    where
        X: Payload,
        XE: Payload,
        XV: Payload,
    {
        let taken = self.derive(|event, downstream| match event {
            Event::End(values) => downstream.parent_ended(values.clone()),
            other => downstream.emit(other.clone()),
        });

        let target = taken.clone();
        let trigger = other.on(move |emission| {
            if kind.map_or(true, |kind| emission.event().kind() == kind) {
                emission.subscription().unsubscribe();
                target.end();
            }
        });
        taken.detach_on_end(trigger);
        taken
    }
}
