// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Building block for operators: a derived stream plus its forwarding rule.
//!
//! Every operator in this crate is a call to [`Stream::derive`] with a
//! forwarding closure. The closure sees each parent event and a
//! [`Downstream`] through which it feeds the child. Custom operators are
//! written the same way and chain like the built-in ones.
//!
//! ```
//! use estream_stream::{Event, Stream};
//!
//! let numbers: Stream<i32> = Stream::new();
//!
//! // Doubles data, drops errors, keeps the default end handling.
//! let doubled = numbers.derive(|event, downstream| match event {
//!     Event::Data(value) => downstream.push(value * 2),
//!     Event::Error(_) => {}
//!     Event::End(values) => downstream.parent_ended(values.clone()),
//! });
//!
//! doubled.on_data(|value, _| assert_eq!(*value, 4));
//! numbers.push(2);
//! ```

use crate::stream::Stream;
use estream_core::{EndValues, EstreamError, Event, Payload, StreamId, StreamOptions};

/// The child side of a parent-to-child link, handed to forwarding closures.
#[derive(Debug)]
pub struct Downstream<'a, T, E = EstreamError, V = T> {
    pub(crate) stream: &'a Stream<T, E, V>,
    pub(crate) parent: StreamId,
    pub(crate) source: StreamId,
}

impl<'a, T: Payload, E: Payload, V: Payload> Downstream<'a, T, E, V> {
    /// Dispatches `Data(value)` on the child, tagged with the originating source.
    pub fn push(&self, value: T) {
        self.emit(Event::Data(value));
    }

    /// Dispatches `Error(error)` on the child, tagged with the originating source.
    pub fn error(&self, error: E) {
        self.emit(Event::Error(error));
    }

    /// Dispatches `event` on the child, tagged with the originating source.
    ///
    /// An `End` passed here ends the child immediately; use
    /// [`parent_ended`](Self::parent_ended) to apply fan-in rules instead.
    pub fn emit(&self, event: Event<T, E, V>) {
        self.stream.inner.dispatch(event, self.source);
    }

    /// Reports that this parent ended with `values`.
    ///
    /// The child ends once every parent it is wired to has ended, carrying
    /// all their end values in the order the parents ended.
    pub fn parent_ended(&self, values: EndValues<V>) {
        self.stream.inner.parent_end(self.parent, values);
    }

    /// Ends the child now and detaches it from all its parents.
    pub fn end(&self) {
        self.stream.end();
    }

    /// Like [`end`](Self::end), carrying `value`.
    pub fn end_with(&self, value: V) {
        self.stream.end_with(value);
    }

    /// Forwards `Error` and `End` with the default rules and returns the
    /// payload of a `Data` event for the caller to handle.
    pub fn relay<'e, X>(&self, event: &'e Event<X, E, V>) -> Option<&'e X> {
        match event {
            Event::Data(value) => Some(value),
            Event::Error(error) => {
                self.error(error.clone());
                None
            }
            Event::End(values) => {
                self.parent_ended(values.clone());
                None
            }
        }
    }

    /// The child stream, for forwarding closures that emit later, from a timer.
    pub const fn stream(&self) -> &'a Stream<T, E, V> {
        self.stream
    }

    /// The parent that delivered the event.
    pub const fn parent(&self) -> StreamId {
        self.parent
    }

    /// The stream the event originated from, which differs from
    /// [`parent`](Self::parent) when the parent itself forwarded it.
    pub const fn source(&self) -> StreamId {
        self.source
    }
}

impl<T: Payload, E: Payload, V: Payload> Stream<T, E, V> {
    /// Creates a child stream wired to this one through `forward`.
    ///
    /// The child subscribes immediately, inherits this stream's scheduler
    /// and uses default options. It unsubscribes when its last subscriber
    /// leaves and subscribes again with the next one. If this stream has
    /// already ended the child is returned ended.
    ///
    /// # Arguments
    ///
    /// * `forward` - Called with every event of this stream and the child's [`Downstream`]
    ///
    /// # Returns
    ///
    /// The child stream.
    pub fn derive<U, W, F>(&self, forward: F) -> Stream<U, E, W>
    where
        U: Payload,
        W: Payload,
        F: Fn(&Event<T, E, V>, &Downstream<'_, U, E, W>) + Send + Sync + 'static,
    {
        self.derive_with(StreamOptions::default(), forward)
    }

    /// [`derive`](Self::derive) with explicit options for the child.
    ///
    /// # Arguments
    ///
    /// * `options` - Options of the child, for example to give it a history
    /// * `forward` - Called with every event of this stream and the child's [`Downstream`]
    pub fn derive_with<U, W, F>(&self, options: StreamOptions, forward: F) -> Stream<U, E, W>
    where
        U: Payload,
        W: Payload,
        F: Fn(&Event<T, E, V>, &Downstream<'_, U, E, W>) + Send + Sync + 'static,
    {
        let child = Stream::from_parts(options, self.inner_scheduler(), None);
        child.connect(self, forward);
        child.end_if_orphaned();
        child
    }
}
