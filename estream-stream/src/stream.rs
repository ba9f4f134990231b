// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The stream core: subscriber registry, synchronous dispatch and history.
//!
//! A [`Stream`] is a cheap-to-clone handle; all clones share one registry.
//! Events are dispatched synchronously, in subscription order, to a snapshot
//! of the subscribers taken when the event arrives. A subscriber added or
//! removed during a dispatch pass takes effect on the next event.
//!
//! # Example
//!
//! ```
//! use estream_stream::{Event, Stream};
//! use std::sync::{Arc, Mutex};
//!
//! let stream: Stream<i32> = Stream::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! stream.on(move |emission| sink.lock().unwrap().push(emission.event().clone()));
//!
//! stream.push(5);
//! stream.end();
//! stream.push(6); // dropped: the stream has ended
//!
//! assert_eq!(*seen.lock().unwrap(), vec![Event::Data(5), Event::end()]);
//! ```

use crate::emission::Emission;
use crate::lifecycle::{Lifecycle, Producer, Session};
use crate::subscription::{Registry, Subscription};
use core::fmt;
use core::ops::RangeBounds;
use estream_core::logging::{debug, trace, warn};
use estream_core::{
    EndValues, EstreamError, Event, History, Payload, Recorded, StreamId, StreamOptions,
};
use estream_runtime::{ambient_scheduler, Scheduler};
use parking_lot::Mutex;
use std::mem;
use std::sync::{Arc, Weak};
use std::time::Instant;

/// A shareable subscriber callback.
///
/// Subscribing the same `Arc` twice through [`Stream::subscribe_shared`]
/// registers it once.
pub type Subscriber<T, E = EstreamError, V = T> =
    Arc<dyn Fn(&Emission<'_, T, E, V>) + Send + Sync + 'static>;

#[derive(Clone)]
struct Registered<T, E, V> {
    key: u64,
    callback: Subscriber<T, E, V>,
    subscription: Subscription,
}

/// Subscribes a child to one of its parents, `None` once that parent has ended.
pub(crate) type Wire<T, E, V> = Arc<dyn Fn(&Stream<T, E, V>) -> Option<Subscription> + Send + Sync>;

/// A parent this stream is still waiting on.
///
/// The wire holds the parent, so a child keeps its parents alive for as long
/// as it waits on them. `subscription` is `None` while the child is detached.
pub(crate) struct SourceLink<T, E, V> {
    pub(crate) id: StreamId,
    pub(crate) subscription: Option<Subscription>,
    pub(crate) wire: Wire<T, E, V>,
}

impl<T, E, V> SourceLink<T, E, V> {
    pub(crate) fn new(id: StreamId, wire: Wire<T, E, V>) -> Self {
        Self {
            id,
            subscription: None,
            wire,
        }
    }
}

/// Everything an `End` releases, run after the lock is dropped.
struct Teardown<T, E, V> {
    sources: Vec<SourceLink<T, E, V>>,
    watchers: Vec<Subscription>,
    session: Option<Session>,
}

impl<T, E, V> Teardown<T, E, V> {
    fn run(self) {
        for link in self.sources {
            if let Some(subscription) = link.subscription {
                subscription.unsubscribe();
            }
        }
        for watcher in self.watchers {
            watcher.unsubscribe();
        }
        // The producer session is dropped without calling its stop function.
        drop(self.session);
    }
}

pub(crate) struct State<T, E, V> {
    pub(crate) ended: bool,
    next_key: u64,
    subscribers: Vec<Registered<T, E, V>>,
    attached_once: bool,
    held: Vec<(Event<T, E, V>, StreamId)>,
    buffered: Vec<(Event<T, E, V>, StreamId)>,
    flush_scheduled: bool,
    history: History<T, E, V>,
    pub(crate) sources: Vec<SourceLink<T, E, V>>,
    pub(crate) detached: bool,
    pub(crate) accumulated_end: EndValues<V>,
    pub(crate) watchers: Vec<Subscription>,
    pub(crate) lifecycle: Option<Lifecycle<T, E, V>>,
}

impl<T: Payload, E: Payload, V: Payload> State<T, E, V> {
    fn new(options: StreamOptions, lifecycle: Option<Lifecycle<T, E, V>>) -> Self {
        Self {
            ended: false,
            next_key: 1,
            subscribers: Vec::new(),
            attached_once: false,
            held: Vec::new(),
            buffered: Vec::new(),
            flush_scheduled: false,
            history: History::with_capacity(options.history),
            sources: Vec::new(),
            detached: false,
            accumulated_end: EndValues::empty(),
            watchers: Vec::new(),
            lifecycle,
        }
    }

    fn holds_end(&self) -> bool {
        self.held.last().is_some_and(|(event, _)| event.is_end())
    }

    /// Nothing left to give a subscriber arriving now.
    fn is_exhausted(&self) -> bool {
        self.ended && self.history.is_empty() && self.buffered.is_empty()
    }

    fn terminate(&mut self) -> Teardown<T, E, V> {
        self.ended = true;
        self.subscribers.clear();
        self.held.clear();
        Teardown {
            sources: mem::take(&mut self.sources),
            watchers: mem::take(&mut self.watchers),
            session: self.lifecycle.as_mut().and_then(Lifecycle::terminate),
        }
    }
}

pub(crate) struct Inner<T, E, V> {
    pub(crate) id: StreamId,
    options: StreamOptions,
    scheduler: Option<Arc<dyn Scheduler>>,
    pub(crate) this: Weak<Self>,
    pub(crate) state: Mutex<State<T, E, V>>,
}

impl<T: Payload, E: Payload, V: Payload> Inner<T, E, V> {
    fn now(&self) -> Instant {
        self.scheduler
            .as_ref()
            .map_or_else(Instant::now, |scheduler| scheduler.now())
    }

    /// Records and delivers one event. `source` tags the originating stream.
    pub(crate) fn dispatch(&self, event: Event<T, E, V>, source: StreamId) {
        let (subscribers, history, teardown) = {
            let mut state = self.state.lock();
            if state.ended || state.holds_end() {
                trace!("{}: dropping {:?} event after end", self.id, event.kind());
                return;
            }
            if !self.options.start_flowing && !state.attached_once {
                state.held.push((event, source));
                return;
            }

            if self.options.buffer && state.subscribers.is_empty() {
                state.buffered.push((event.clone(), source));
            }
            let subscribers = state.subscribers.clone();
            let history = if state.history.is_enabled() {
                let snapshot = state.history.events();
                state.history.record(event.clone(), self.now());
                snapshot
            } else {
                Vec::new()
            };
            let teardown = event.is_end().then(|| state.terminate());
            (subscribers, history, teardown)
        };

        for registered in &subscribers {
            (registered.callback)(&Emission {
                event: &event,
                history: &history,
                stream: self.id,
                source,
                subscription: &registered.subscription,
            });
        }

        if let Some(teardown) = teardown {
            teardown.run();
        }
    }

    fn register(&self, callback: Subscriber<T, E, V>) -> Subscription {
        let (subscription, held, job, rewire, flush) = {
            let mut state = self.state.lock();
            if state.is_exhausted() {
                warn!("{}: subscribed after end with an empty history", self.id);
                return Subscription::inert();
            }

            let key = state.next_key;
            state.next_key += 1;
            let registry: Weak<dyn Registry> = self.this.clone();
            let subscription = Subscription::new(registry, self.id, key);
            state.subscribers.push(Registered {
                key,
                callback,
                subscription: subscription.clone(),
            });

            let held = if state.attached_once {
                Vec::new()
            } else {
                state.attached_once = true;
                mem::take(&mut state.held)
            };
            let first = state.subscribers.len() == 1 && !state.ended;
            let job = if first {
                state.lifecycle.as_mut().and_then(Lifecycle::attach)
            } else {
                None
            };
            let rewire = first && mem::take(&mut state.detached);
            let flush = !state.buffered.is_empty() && !state.flush_scheduled;
            state.flush_scheduled |= flush;
            (subscription, held, job, rewire, flush)
        };

        for (event, source) in held {
            self.dispatch(event, source);
        }
        if rewire {
            self.rewire();
        }
        if let Some(job) = job {
            self.schedule(job);
        }
        if flush {
            self.schedule_flush();
        }
        subscription
    }

    /// Flushes the buffer on the next scheduler turn, or right away without a scheduler.
    fn schedule_flush(&self) {
        let this = Weak::clone(&self.this);
        let flush = move || {
            if let Some(inner) = this.upgrade() {
                inner.flush_buffer();
            }
        };
        match &self.scheduler {
            Some(scheduler) => {
                scheduler.defer(Box::new(flush));
            }
            None => flush(),
        }
    }

    /// Delivers every buffered event, oldest first, to the current subscribers.
    fn flush_buffer(&self) {
        let (subscribers, buffered, history) = {
            let mut state = self.state.lock();
            state.flush_scheduled = false;
            if state.subscribers.is_empty() {
                return;
            }
            (
                state.subscribers.clone(),
                mem::take(&mut state.buffered),
                state.history.events(),
            )
        };
        trace!("{}: flushing {} buffered events", self.id, buffered.len());

        for (event, source) in &buffered {
            for registered in &subscribers {
                (registered.callback)(&Emission {
                    event,
                    history: &history,
                    stream: self.id,
                    source: *source,
                    subscription: &registered.subscription,
                });
            }
        }
    }
}

impl<T: Payload, E: Payload, V: Payload> Registry for Inner<T, E, V> {
    fn remove(&self, key: u64) -> bool {
        let (removed, job, released) = {
            let mut state = self.state.lock();
            let Some(index) = state.subscribers.iter().position(|r| r.key == key) else {
                return false;
            };
            let removed = state.subscribers.remove(index);
            let last = state.subscribers.is_empty() && !state.ended;
            let job = if last {
                state.lifecycle.as_mut().and_then(Lifecycle::detach)
            } else {
                None
            };
            let released: Vec<Subscription> = if last && !state.sources.is_empty() {
                state.detached = true;
                state
                    .sources
                    .iter_mut()
                    .filter_map(|link| link.subscription.take())
                    .collect()
            } else {
                Vec::new()
            };
            (removed, job, released)
        };
        drop(removed);

        if !released.is_empty() {
            debug!(
                "{}: last subscriber left, detaching from {} parents",
                self.id,
                released.len()
            );
        }
        // Unsubscribing may empty a parent in turn, which detaches it further up.
        for subscription in released {
            subscription.unsubscribe();
        }
        if let Some(job) = job {
            self.schedule(job);
        }
        true
    }

    fn contains(&self, key: u64) -> bool {
        self.state.lock().subscribers.iter().any(|r| r.key == key)
    }
}

/// Handle to a push-based event stream.
///
/// Cloning is cheap and every clone refers to the same stream.
pub struct Stream<T, E = EstreamError, V = T> {
    pub(crate) inner: Arc<Inner<T, E, V>>,
}

impl<T: Payload, E: Payload, V: Payload> Stream<T, E, V> {
    /// A bare stream with default options, fed only through [`push`](Self::push) and friends.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(StreamOptions::default())
    }

    /// Creates a bare stream configured by `options`.
    ///
    /// The stream picks up the ambient scheduler: Tokio's when a Tokio runtime
    /// is current on the calling thread, none otherwise. Use
    /// [`with_scheduler`](Self::with_scheduler) to pick one explicitly.
    ///
    /// # Arguments
    ///
    /// * `options` - History capacity, initial pause and buffering
    ///
    /// # Returns
    ///
    /// A stream with no subscribers and no parents.
    ///
    /// # Examples
    ///
    /// ```
    /// use estream_stream::{Event, Stream, StreamOptions};
    ///
    /// let stream: Stream<i32> = Stream::with_options(StreamOptions::new().history(2));
    /// stream.push(1);
    /// stream.push(2);
    /// stream.push(3);
    ///
    /// assert_eq!(stream.history(), vec![Event::Data(2), Event::Data(3)]);
    /// ```
    #[must_use]
    pub fn with_options(options: StreamOptions) -> Self {
        Self::from_parts(options, ambient_scheduler(), None)
    }

    /// A bare stream whose timestamps and timers come from `scheduler`.
    ///
    /// Streams derived from it inherit the scheduler.
    #[must_use]
    pub fn with_scheduler(options: StreamOptions, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::from_parts(options, Some(scheduler), None)
    }

    /// A stream backed by a lazily started producer, scheduled on Tokio.
    ///
    /// See [`Producer`] for the start/stop rules. The start and stop are
    /// spawned on the Tokio runtime current when they are scheduled. Outside
    /// a runtime they run inline instead, so the start happens inside the
    /// first subscribe: a second subscriber added in the same turn does not
    /// share that start and misses whatever it pushed synchronously. Hosts
    /// without a Tokio runtime should use [`from_producer_on`](Self::from_producer_on)
    /// with their own scheduler, such as `ManualScheduler`.
    #[cfg(feature = "runtime-tokio")]
    #[must_use]
    pub fn from_producer(producer: Producer<T, E, V>, options: StreamOptions) -> Self {
        Self::from_producer_on(producer, options, estream_runtime::default_scheduler())
    }

    /// A stream backed by a lazily started producer whose start and stop run on `scheduler`.
    ///
    /// # Arguments
    ///
    /// * `producer` - The start (and optional stop) functions
    /// * `options` - Options of the new stream
    /// * `scheduler` - Runs the start and stop, and timestamps history entries
    ///
    /// # Returns
    ///
    /// A stream whose producer has not started yet. It starts on the
    /// scheduler turn after the first subscriber arrives.
    #[must_use]
    pub fn from_producer_on(
        producer: Producer<T, E, V>,
        options: StreamOptions,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let lifecycle = Lifecycle::new(producer, Arc::clone(&scheduler));
        Self::from_parts(options, Some(scheduler), Some(lifecycle))
    }

    pub(crate) fn from_parts(
        options: StreamOptions,
        scheduler: Option<Arc<dyn Scheduler>>,
        lifecycle: Option<Lifecycle<T, E, V>>,
    ) -> Self {
        let inner = Arc::new_cyclic(|this| Inner {
            id: StreamId::next(),
            options,
            scheduler,
            this: this.clone(),
            state: Mutex::new(State::new(options, lifecycle)),
        });
        Self { inner }
    }

    /// The process-wide unique id of this stream, shared by all its clones.
    pub fn id(&self) -> StreamId {
        self.inner.id
    }

    /// The options the stream was built with.
    pub fn options(&self) -> StreamOptions {
        self.inner.options
    }

    /// The scheduler timers and timestamps of this stream use, if any.
    pub fn scheduler(&self) -> Option<&Arc<dyn Scheduler>> {
        self.inner.scheduler.as_ref()
    }

    pub(crate) fn inner_scheduler(&self) -> Option<Arc<dyn Scheduler>> {
        self.inner.scheduler.clone()
    }

    /// Dispatches `Data(value)`. A no-op once the stream has ended.
    pub fn push(&self, value: T) {
        self.emit(Event::Data(value));
    }

    /// Dispatches `Error(error)`. Errors never end the stream.
    pub fn error(&self, error: E) {
        self.emit(Event::Error(error));
    }

    /// Ends the stream with no end value, detaching it from any parents.
    pub fn end(&self) {
        self.emit(Event::end());
    }

    /// Ends the stream carrying `value`.
    pub fn end_with(&self, value: V) {
        self.emit(Event::end_with(value));
    }

    /// Dispatches an already built event unchanged.
    pub fn emit(&self, event: Event<T, E, V>) {
        self.inner.dispatch(event, self.inner.id);
    }

    /// Registers `callback` for every event dispatched from now on.
    ///
    /// On a buffering stream the buffered events are flushed to every
    /// subscriber on the next scheduler turn. A derived stream that detached
    /// from its parents when its last subscriber left is wired to them again.
    ///
    /// Returns an inert subscription, and logs a warning, if the stream has
    /// ended with nothing left in its history or buffer.
    pub fn on<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Emission<'_, T, E, V>) + Send + Sync + 'static,
    {
        self.inner.register(Arc::new(callback))
    }

    /// Registers a shared callback unless that same `Arc` is already
    /// registered, in which case the existing subscription is returned.
    pub fn subscribe_shared(&self, callback: Subscriber<T, E, V>) -> Subscription {
        let existing = self
            .inner
            .state
            .lock()
            .subscribers
            .iter()
            .find(|r| std::ptr::addr_eq(Arc::as_ptr(&r.callback), Arc::as_ptr(&callback)))
            .map(|r| r.subscription.clone());
        match existing {
            Some(subscription) => subscription,
            None => self.inner.register(callback),
        }
    }

    /// Removes the registration of `callback` made through
    /// [`subscribe_shared`](Self::subscribe_shared). Returns whether it was found.
    pub fn off(&self, callback: &Subscriber<T, E, V>) -> bool {
        let key = self
            .inner
            .state
            .lock()
            .subscribers
            .iter()
            .find(|r| std::ptr::addr_eq(Arc::as_ptr(&r.callback), Arc::as_ptr(callback)))
            .map(|r| r.key);
        key.is_some_and(|key| self.inner.remove(key))
    }

    /// Like [`on`](Self::on), called only for `Data` events.
    pub fn on_data<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T, &Emission<'_, T, E, V>) + Send + Sync + 'static,
    {
        self.on(move |emission| {
            if let Event::Data(value) = emission.event() {
                callback(value, emission);
            }
        })
    }

    /// Like [`on`](Self::on), called only for `Error` events.
    pub fn on_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E, &Emission<'_, T, E, V>) + Send + Sync + 'static,
    {
        self.on(move |emission| {
            if let Event::Error(error) = emission.event() {
                callback(error, emission);
            }
        })
    }

    /// Like [`on`](Self::on), called only for the `End` event.
    pub fn on_end<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&EndValues<V>, &Emission<'_, T, E, V>) + Send + Sync + 'static,
    {
        self.on(move |emission| {
            if let Event::End(values) = emission.event() {
                callback(values, emission);
            }
        })
    }

    /// Delivers `event` to the current subscribers without recording it and
    /// without applying end-of-stream rules. Used to replay history.
    pub fn redeliver(&self, event: &Event<T, E, V>) {
        let (subscribers, history) = {
            let state = self.inner.state.lock();
            (state.subscribers.clone(), state.history.events())
        };
        for registered in &subscribers {
            (registered.callback)(&Emission {
                event,
                history: &history,
                stream: self.inner.id,
                source: self.inner.id,
                subscription: &registered.subscription,
            });
        }
    }

    /// Whether the stream has dispatched its `End`.
    pub fn is_ended(&self) -> bool {
        self.inner.state.lock().ended
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }

    /// Number of parents this stream is still waiting on before it ends.
    pub fn pending_sources(&self) -> usize {
        self.inner.state.lock().sources.len()
    }

    /// The retained history, oldest first.
    pub fn history(&self) -> Vec<Event<T, E, V>> {
        self.inner.state.lock().history.events()
    }

    /// The retained events whose position falls in `range`.
    pub fn history_range(&self, range: impl RangeBounds<usize>) -> Vec<Event<T, E, V>> {
        self.inner.state.lock().history.range(range)
    }

    /// The retained events with their dispatch instants, starting at `start`.
    pub fn history_records(&self, start: usize) -> Vec<Recorded<T, E, V>> {
        self.inner.state.lock().history.records_from(start)
    }

    pub fn clear_history(&self) {
        self.inner.state.lock().history.clear();
    }

    /// Drains up to `limit` buffered events, oldest first, or all of them
    /// when `limit` is `None`.
    ///
    /// Only streams built with [`StreamOptions::buffer`] buffer anything.
    /// Useful to read what was dispatched before nobody subscribed, even
    /// after the stream has ended.
    ///
    /// # Examples
    ///
    /// ```
    /// use estream_stream::{Event, Stream, StreamOptions};
    ///
    /// let stream: Stream<i32> = Stream::with_options(StreamOptions::new().buffer(true));
    /// stream.push(1);
    /// stream.push(2);
    /// stream.end();
    ///
    /// assert_eq!(stream.take_buffer(Some(1)), vec![Event::Data(1)]);
    /// assert_eq!(stream.take_buffer(None), vec![Event::Data(2), Event::end()]);
    /// assert!(stream.take_buffer(None).is_empty());
    /// ```
    pub fn take_buffer(&self, limit: Option<usize>) -> Vec<Event<T, E, V>> {
        let mut state = self.inner.state.lock();
        let count = limit.map_or(state.buffered.len(), |limit| limit.min(state.buffered.len()));
        state
            .buffered
            .drain(..count)
            .map(|(event, _)| event)
            .collect()
    }

    /// Number of buffered events waiting for a subscriber.
    pub fn buffered_len(&self) -> usize {
        self.inner.state.lock().buffered.len()
    }

    pub fn clear_buffer(&self) {
        self.inner.state.lock().buffered.clear();
    }

    /// Unsubscribes `subscription` when this stream ends, or right away if it already has.
    pub(crate) fn detach_on_end(&self, subscription: Subscription) {
        let mut state = self.inner.state.lock();
        if state.ended {
            drop(state);
            subscription.unsubscribe();
        } else {
            state.watchers.push(subscription);
        }
    }
}

impl<T: Payload, E: Payload, V: Payload> Default for Stream<T, E, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, V> Clone for Stream<T, E, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E, V> fmt::Debug for Stream<T, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Stream")
            .field("id", &self.inner.id)
            .field("ended", &state.ended)
            .field("subscribers", &state.subscribers.len())
            .field("sources", &state.sources.len())
            .finish_non_exhaustive()
    }
}
