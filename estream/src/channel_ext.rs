// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods turning an `async_channel::Receiver` into a producer-backed [`Stream`].

use estream_core::logging::{debug, warn};
use estream_core::{Payload, StreamOptions};
use estream_stream::{Producer, Sink, Stream};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Aborts the forwarding task when the producer stops.
struct Forwarder(JoinHandle<()>);

impl Drop for Forwarder {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Extension trait for `async_channel::Receiver` to create estream streams.
pub trait ReceiverExt<T> {
    /// Converts the receiver into a stream whose `Data` events are the
    /// received values, transformed by `mapper`.
    ///
    /// Receiving starts lazily, on the Tokio runtime, once the stream gets its
    /// first subscriber. The stream ends when every sender has been dropped.
    /// When the last subscriber leaves, receiving stops and is not resumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use estream::prelude::*;
    /// use futures::StreamExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let (tx, rx) = async_channel::unbounded::<u32>();
    /// let celsius: Stream<f64> = rx.into_estream_mapped(StreamOptions::new(), |raw| f64::from(raw) / 10.0);
    /// let readings = celsius.into_async_stream();
    ///
    /// tx.send(215).await.unwrap();
    /// drop(tx);
    ///
    /// let events: Vec<_> = readings.collect().await;
    /// assert_eq!(events, vec![Event::Data(21.5), Event::end()]);
    /// # }
    /// ```
    fn into_estream_mapped<U, F>(self, options: StreamOptions, mapper: F) -> Stream<U>
    where
        U: Payload,
        F: Fn(T) -> U + Send + Sync + 'static;

    /// Like [`into_estream_mapped`](Self::into_estream_mapped) without a transformation.
    fn into_estream(self, options: StreamOptions) -> Stream<T>
    where
        T: Payload;
}

impl<T: Send + 'static> ReceiverExt<T> for async_channel::Receiver<T> {
    fn into_estream_mapped<U, F>(self, options: StreamOptions, mapper: F) -> Stream<U>
    where
        U: Payload,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let mapper = std::sync::Arc::new(mapper);
        let producer = Producer::new(move |sink: Sink<U>| {
            let Ok(runtime) = Handle::try_current() else {
                warn!("no Tokio runtime is current; channel receiver not started");
                return None;
            };
            let receiver = self.clone();
            let mapper = std::sync::Arc::clone(&mapper);
            Some(Forwarder(runtime.spawn(async move {
                while let Ok(value) = receiver.recv().await {
                    if sink.is_closed() {
                        return;
                    }
                    sink.push(mapper(value));
                }
                debug!("channel closed; ending stream");
                sink.end();
            })))
        });
        Stream::from_producer(producer, options)
    }

    fn into_estream(self, options: StreamOptions) -> Stream<T>
    where
        T: Payload,
    {
        self.into_estream_mapped(options, |value| value)
    }
}
