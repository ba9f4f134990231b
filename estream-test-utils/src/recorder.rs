// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_core::{Event, Payload, StreamId};
use estream_stream::{Stream, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Entry<T, E, V> {
    event: Event<T, E, V>,
    source: StreamId,
    history_len: usize,
}

/// Subscribes to a stream and keeps everything it delivers.
///
/// ```rust
/// use estream_stream::{Event, Stream};
/// use estream_test_utils::EventRecorder;
///
/// let stream: Stream<i32> = Stream::new();
/// let recorder = EventRecorder::attach(&stream);
///
/// stream.push(1);
/// stream.end_with(9);
///
/// assert_eq!(recorder.data(), vec![1]);
/// assert_eq!(recorder.end_values(), Some(vec![9]));
/// ```
pub struct EventRecorder<T, E, V> {
    entries: Arc<Mutex<Vec<Entry<T, E, V>>>>,
    subscription: Subscription,
}

impl<T: Payload, E: Payload, V: Payload> EventRecorder<T, E, V> {
    pub fn attach(stream: &Stream<T, E, V>) -> Self {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&entries);
        let subscription = stream.on(move |emission| {
            sink.lock().push(Entry {
                event: emission.event().clone(),
                source: emission.source(),
                history_len: emission.history().len(),
            });
        });
        Self {
            entries,
            subscription,
        }
    }

    pub fn events(&self) -> Vec<Event<T, E, V>> {
        self.entries.lock().iter().map(|e| e.event.clone()).collect()
    }

    pub fn data(&self) -> Vec<T> {
        self.entries
            .lock()
            .iter()
            .filter_map(|e| e.event.as_data().cloned())
            .collect()
    }

    pub fn errors(&self) -> Vec<E> {
        self.entries
            .lock()
            .iter()
            .filter_map(|e| e.event.as_error().cloned())
            .collect()
    }

    /// The end values, or `None` if no `End` was delivered.
    pub fn end_values(&self) -> Option<Vec<V>> {
        self.entries
            .lock()
            .iter()
            .find_map(|e| e.event.as_end().map(|values| values.to_vec()))
    }

    pub fn end_count(&self) -> usize {
        self.entries.lock().iter().filter(|e| e.event.is_end()).count()
    }

    /// The originating stream of each delivered event.
    pub fn sources(&self) -> Vec<StreamId> {
        self.entries.lock().iter().map(|e| e.source).collect()
    }

    /// How many past events each delivery carried in its history snapshot.
    pub fn history_lens(&self) -> Vec<usize> {
        self.entries.lock().iter().map(|e| e.history_len).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub const fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Stops recording. Already recorded events are kept.
    pub fn detach(&self) -> bool {
        self.subscription.unsubscribe()
    }
}
