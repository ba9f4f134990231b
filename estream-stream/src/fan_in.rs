// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Streams fed by several parents.
//!
//! A fan-in stream forwards `Data` and `Error` from every parent as they
//! arrive and ends only after all of its parents have ended. Its `End`
//! carries the parents' end values concatenated in the order the parents
//! ended. A parent that has already ended when it is wired in counts as
//! ended without values.
//!
//! Derived and fan-in streams subscribe to their parents when they are
//! built. When their last subscriber leaves they unsubscribe from every
//! parent, which lets producer-backed parents stop, and they subscribe again
//! when the next subscriber arrives.
//!
//! ```
//! use estream_stream::{Stream, StreamOptions};
//! use std::sync::{Arc, Mutex};
//!
//! let left: Stream<&str> = Stream::new();
//! let right: Stream<&str> = Stream::new();
//! let both = Stream::combine([&left, &right], StreamOptions::new());
//!
//! let ends = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&ends);
//! both.on_end(move |values, _| sink.lock().unwrap().extend(values.iter().copied()));
//!
//! right.end_with("r");
//! assert!(!both.is_ended());
//! left.end_with("l");
//!
//! assert_eq!(*ends.lock().unwrap(), vec!["r", "l"]);
//! ```

use crate::downstream::Downstream;
use crate::stream::{Inner, SourceLink, Stream, Wire};
use core::mem;
use estream_core::logging::debug;
use estream_core::{EndValues, Event, Payload, StreamId, StreamOptions};
use std::sync::Arc;

impl<T: Payload, E: Payload, V: Payload> Inner<T, E, V> {
    /// Subscribes again to every parent this stream detached from.
    ///
    /// A parent that ended in the meantime counts as ended without values.
    pub(crate) fn rewire(&self) {
        let Some(inner) = self.this.upgrade() else {
            return;
        };
        let stream = Stream { inner };
        let links: Vec<(StreamId, Wire<T, E, V>)> = stream
            .inner
            .state
            .lock()
            .sources
            .iter()
            .filter(|link| link.subscription.is_none())
            .map(|link| (link.id, Arc::clone(&link.wire)))
            .collect();
        debug!("{}: rewiring {} parents", self.id, links.len());
        for (parent, wire) in links {
            stream.attach_link(parent, &wire);
        }
    }

    /// Handles the `End` of `parent`, ending this stream once no parent is left.
    pub(crate) fn parent_end(&self, parent: StreamId, values: EndValues<V>) {
        let (link, finished) = {
            let mut state = self.state.lock();
            if state.ended {
                return;
            }
            let Some(index) = state.sources.iter().position(|link| link.id == parent) else {
                return;
            };
            let link = state.sources.remove(index);
            state.accumulated_end.concat(values);
            let finished = state
                .sources
                .is_empty()
                .then(|| mem::take(&mut state.accumulated_end));
            (link, finished)
        };
        drop(link);

        if let Some(values) = finished {
            self.dispatch(Event::End(values), self.id);
        }
    }
}

impl<T: Payload, E: Payload, V: Payload> Stream<T, E, V> {
    /// Builds a stream fed by every stream in `sources`.
    ///
    /// With no sources the result is a bare stream. The scheduler of the
    /// first source is inherited.
    pub fn combine<'a, I>(sources: I, options: StreamOptions) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let sources: Vec<&Self> = sources.into_iter().collect();
        let scheduler = sources
            .first()
            .map_or_else(estream_runtime::ambient_scheduler, |first| first.inner_scheduler());
        let combined = Self::from_parts(options, scheduler, None);
        for source in sources.iter().copied() {
            combined.connect(source, |event, downstream| match event {
                Event::End(values) => downstream.parent_ended(values.clone()),
                other => downstream.emit(other.clone()),
            });
        }
        if !sources.is_empty() {
            combined.end_if_orphaned();
        }
        combined
    }

    /// A new stream fed by this stream and `others`, with this stream's options.
    pub fn add_sources<'a, I>(&'a self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        Self::combine(core::iter::once(self).chain(others), self.options())
    }

    /// Subscribes this stream to `parent`, routing each parent event through `forward`.
    ///
    /// Parents are counted once: wiring the same parent twice is a no-op.
    /// The link can be unsubscribed and subscribed again: the stream detaches
    /// from its parents when its last subscriber leaves and rewires on the
    /// next one.
    pub(crate) fn connect<P, PV, F>(&self, parent: &Stream<P, E, PV>, forward: F)
    where
        P: Payload,
        PV: Payload,
        F: Fn(&Event<P, E, PV>, &Downstream<'_, T, E, V>) + Send + Sync + 'static,
    {
        let parent_id = parent.id();
        if parent.is_ended() {
            debug!("{}: {} already ended, counted as ended", self.id(), parent_id);
            return;
        }

        let forward = Arc::new(forward);
        let source = parent.clone();
        let wire: Wire<T, E, V> = Arc::new(move |child: &Self| {
            if source.is_ended() {
                return None;
            }
            let child = child.clone();
            let forward = Arc::clone(&forward);
            Some(source.on(move |emission| {
                let downstream = Downstream {
                    stream: &child,
                    parent: parent_id,
                    source: emission.source(),
                };
                forward(emission.event(), &downstream);
            }))
        });

        {
            let mut state = self.inner.state.lock();
            if state.ended || state.sources.iter().any(|link| link.id == parent_id) {
                return;
            }
            state
                .sources
                .push(SourceLink::new(parent_id, Arc::clone(&wire)));
        }
        self.attach_link(parent_id, &wire);
    }

    /// Subscribes the pending link to `parent` through `wire`.
    fn attach_link(&self, parent: StreamId, wire: &Wire<T, E, V>) {
        let Some(subscription) = wire(self) else {
            debug!("{}: {} ended while detached", self.id(), parent);
            self.inner.parent_end(parent, EndValues::empty());
            return;
        };

        let mut state = self.inner.state.lock();
        if !state.detached {
            let link = state
                .sources
                .iter_mut()
                .find(|link| link.id == parent && link.subscription.is_none());
            if let Some(link) = link {
                link.subscription = Some(subscription);
                return;
            }
        }
        // The parent ended, or this stream ended or detached, while subscribing.
        drop(state);
        subscription.unsubscribe();
    }

    /// Ends the stream if every parent it was given had already ended.
    pub(crate) fn end_if_orphaned(&self) {
        let values = {
            let mut state = self.inner.state.lock();
            if state.ended || !state.sources.is_empty() {
                return;
            }
            mem::take(&mut state.accumulated_end)
        };
        self.inner.dispatch(Event::End(values), self.id());
    }
}
