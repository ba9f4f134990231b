// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridge from push delivery to a pull-based [`futures::Stream`].
//!
//! The bridge subscribes like any other subscriber and buffers events in an
//! unbounded channel. The async stream yields every event including the
//! final `End`, then terminates. Dropping it unsubscribes.
//!
//! ```
//! use estream_stream::{Event, IntoAsyncStream, Stream};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let numbers: Stream<i32> = Stream::new();
//! let events = numbers.into_async_stream();
//!
//! numbers.push(1);
//! numbers.end();
//!
//! let collected: Vec<_> = events.collect().await;
//! assert_eq!(collected, vec![Event::Data(1), Event::end()]);
//! # }
//! ```

use crate::stream::Stream;
use crate::subscription::Subscription;
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};
use estream_core::{EstreamError, Event, Payload};
use futures::stream::Stream as AsyncStream;

/// Async view over the events of a [`Stream`].
pub struct EventStream<T, E = EstreamError, V = T> {
    receiver: Pin<Box<async_channel::Receiver<Event<T, E, V>>>>,
    subscription: Subscription,
}

impl<T, E, V> EventStream<T, E, V> {
    /// The subscription feeding this stream; inert when the source had already ended.
    pub const fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T, E, V> AsyncStream for EventStream<T, E, V> {
    type Item = Event<T, E, V>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.as_mut().poll_next(cx)
    }
}

impl<T, E, V> Drop for EventStream<T, E, V> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl<T, E, V> fmt::Debug for EventStream<T, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("buffered", &self.receiver.len())
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// Extension trait providing `into_async_stream`.
pub trait IntoAsyncStream<T, E, V> {
    /// Subscribes and exposes the events as a [`futures::Stream`].
    ///
    /// A stream that has already ended yields nothing.
    fn into_async_stream(&self) -> EventStream<T, E, V>;
}

impl<T: Payload, E: Payload, V: Payload> IntoAsyncStream<T, E, V> for Stream<T, E, V> {
    fn into_async_stream(&self) -> EventStream<T, E, V> {
        let (sender, receiver) = async_channel::unbounded();
        let subscription = if self.is_ended() {
            sender.close();
            Subscription::inert()
        } else {
            self.on(move |emission| {
                let event = emission.event();
                if sender.try_send(event.clone()).is_err() {
                    return;
                }
                if event.is_end() {
                    sender.close();
                }
            })
        };
        EventStream {
            receiver: Box::pin(receiver),
            subscription,
        }
    }
}
