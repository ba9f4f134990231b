// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscription::Subscription;
use estream_core::{EstreamError, Event, StreamId};

/// What a subscriber receives for every dispatched event.
#[derive(Debug)]
pub struct Emission<'a, T, E = EstreamError, V = T> {
    pub(crate) event: &'a Event<T, E, V>,
    pub(crate) history: &'a [Event<T, E, V>],
    pub(crate) stream: StreamId,
    pub(crate) source: StreamId,
    pub(crate) subscription: &'a Subscription,
}

impl<'a, T, E, V> Emission<'a, T, E, V> {
    pub const fn event(&self) -> &'a Event<T, E, V> {
        self.event
    }

    /// Events recorded before this one, oldest first. Empty when the stream keeps no history.
    pub const fn history(&self) -> &'a [Event<T, E, V>] {
        self.history
    }

    /// The stream dispatching the event.
    pub const fn stream_id(&self) -> StreamId {
        self.stream
    }

    /// The stream the event originated from.
    ///
    /// Equals [`stream_id`](Self::stream_id) unless the event was forwarded
    /// from a parent of a fan-in stream.
    pub const fn source(&self) -> StreamId {
        self.source
    }

    /// The receiving subscriber's own handle, so it can detach from inside the callback.
    pub const fn subscription(&self) -> &'a Subscription {
        self.subscription
    }
}
