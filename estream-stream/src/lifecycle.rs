// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazy start and stop of producer-backed streams.
//!
//! A producer's `start` runs on the scheduler's next turn after the subscriber
//! count goes from zero to one, so subscriptions made in the same turn share
//! one start. When the count drops back to zero a stop is scheduled the same
//! way; a subscriber arriving before it runs cancels it and the running
//! session carries on. Nothing starts or stops once the stream has ended.
//!
//! # Example
//!
//! ```
//! use estream_runtime::ManualScheduler;
//! use estream_stream::{Producer, Stream, StreamOptions};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let scheduler = ManualScheduler::new();
//! let starts = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&starts);
//! let producer: Producer<i32> = Producer::new(move |sink| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     sink.push(1);
//! });
//! let stream = Stream::from_producer_on(producer, StreamOptions::new(), Arc::new(scheduler.clone()));
//!
//! stream.on(|_| {});
//! stream.on(|_| {});
//! assert_eq!(starts.load(Ordering::SeqCst), 0);
//!
//! scheduler.run_until_idle();
//! assert_eq!(starts.load(Ordering::SeqCst), 1);
//! ```

use crate::stream::Inner;
use core::fmt;
use core::mem;
use estream_core::logging::debug;
use estream_core::{EstreamError, Event, Payload, StreamId};
use estream_runtime::{Scheduler, TaskHandle};
use std::sync::{Arc, Weak};

type StartFn<T, E, V> = Arc<dyn Fn(Sink<T, E, V>) -> Session + Send + Sync>;

/// The stop half of a running producer.
pub(crate) struct Session(Box<dyn FnOnce() + Send>);

impl Session {
    fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(stop))
    }

    fn close(self) {
        (self.0)();
    }
}

/// A lazily started source of events for [`Stream::from_producer`](crate::Stream::from_producer).
///
/// `start` receives a [`Sink`] and returns an artifact (a timer guard, a
/// task handle, a closure, anything) that lives for as long as the producer runs.
pub struct Producer<T, E = EstreamError, V = T> {
    start: StartFn<T, E, V>,
    restartable: bool,
}

impl<T: Payload, E: Payload, V: Payload> Producer<T, E, V> {
    /// A producer without a stop function.
    ///
    /// On stop its artifact is dropped. Once stopped it is never started
    /// again: later subscribers only see what is left in the history.
    pub fn new<A, F>(start: F) -> Self
    where
        A: Send + 'static,
        F: Fn(Sink<T, E, V>) -> A + Send + Sync + 'static,
    {
        Self {
            start: Arc::new(move |sink: Sink<T, E, V>| {
                let artifact = start(sink);
                Session::new(move || drop(artifact))
            }),
            restartable: false,
        }
    }

    /// A producer that hands its artifact to `stop` and can be restarted
    /// when subscribers come back after a full stop.
    pub fn with_stop<A, F, S>(start: F, stop: S) -> Self
    where
        A: Send + 'static,
        F: Fn(Sink<T, E, V>) -> A + Send + Sync + 'static,
        S: Fn(A) + Send + Sync + 'static,
    {
        let stop = Arc::new(stop);
        Self {
            start: Arc::new(move |sink: Sink<T, E, V>| {
                let artifact = start(sink);
                let stop = Arc::clone(&stop);
                Session::new(move || stop(artifact))
            }),
            restartable: true,
        }
    }

    pub const fn is_restartable(&self) -> bool {
        self.restartable
    }
}

impl<T, E, V> Clone for Producer<T, E, V> {
    fn clone(&self) -> Self {
        Self {
            start: Arc::clone(&self.start),
            restartable: self.restartable,
        }
    }
}

impl<T, E, V> fmt::Debug for Producer<T, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("restartable", &self.restartable)
            .finish_non_exhaustive()
    }
}

/// The producer's handle on its stream.
///
/// Holds a weak reference: a running producer does not keep its stream
/// alive, and pushes into a dropped or ended stream are no-ops.
pub struct Sink<T, E = EstreamError, V = T> {
    stream: Weak<Inner<T, E, V>>,
}

impl<T: Payload, E: Payload, V: Payload> Sink<T, E, V> {
    pub(crate) fn new(stream: Weak<Inner<T, E, V>>) -> Self {
        Self { stream }
    }

    pub fn push(&self, value: T) {
        self.emit(Event::Data(value));
    }

    pub fn error(&self, error: E) {
        self.emit(Event::Error(error));
    }

    pub fn end(&self) {
        self.emit(Event::end());
    }

    pub fn end_with(&self, value: V) {
        self.emit(Event::end_with(value));
    }

    pub fn emit(&self, event: Event<T, E, V>) {
        if let Some(inner) = self.stream.upgrade() {
            inner.dispatch(event, inner.id);
        }
    }

    /// `true` once the stream has ended or been dropped.
    pub fn is_closed(&self) -> bool {
        self.stream
            .upgrade()
            .map_or(true, |inner| inner.state.lock().ended)
    }

    pub fn stream_id(&self) -> Option<StreamId> {
        self.stream.upgrade().map(|inner| inner.id)
    }
}

impl<T, E, V> Clone for Sink<T, E, V> {
    fn clone(&self) -> Self {
        Self {
            stream: Weak::clone(&self.stream),
        }
    }
}

impl<T, E, V> fmt::Debug for Sink<T, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

enum Phase {
    Idle,
    StartScheduled {
        epoch: u64,
        handle: Option<TaskHandle>,
    },
    Running {
        session: Option<Session>,
    },
    StopScheduled {
        epoch: u64,
        handle: Option<TaskHandle>,
        session: Option<Session>,
    },
    Stopped,
}

/// Work to hand to the scheduler once the stream lock is released.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Job {
    Start(u64),
    Stop(u64),
}

pub(crate) struct Lifecycle<T, E, V> {
    producer: Producer<T, E, V>,
    scheduler: Arc<dyn Scheduler>,
    phase: Phase,
    epoch: u64,
}

impl<T, E, V> Lifecycle<T, E, V> {
    pub(crate) fn new(producer: Producer<T, E, V>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            producer,
            scheduler,
            phase: Phase::Idle,
            epoch: 0,
        }
    }

    fn schedule_start(&mut self) -> Job {
        self.epoch += 1;
        self.phase = Phase::StartScheduled {
            epoch: self.epoch,
            handle: None,
        };
        Job::Start(self.epoch)
    }

    /// The subscriber count went from zero to one.
    pub(crate) fn attach(&mut self) -> Option<Job> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => Some(self.schedule_start()),
            Phase::Stopped if self.producer.restartable => Some(self.schedule_start()),
            Phase::StopScheduled {
                handle, session, ..
            } => {
                if let Some(handle) = handle {
                    handle.cancel();
                }
                self.phase = Phase::Running { session };
                None
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// The subscriber count dropped to zero.
    pub(crate) fn detach(&mut self) -> Option<Job> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::StartScheduled { handle, .. } => {
                if let Some(handle) = handle {
                    handle.cancel();
                }
                None
            }
            Phase::Running { session } => {
                self.epoch += 1;
                self.phase = Phase::StopScheduled {
                    epoch: self.epoch,
                    handle: None,
                    session,
                };
                Some(Job::Stop(self.epoch))
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Keeps the cancellation handle of `job` if it is still pending.
    pub(crate) fn track(&mut self, job: Job, task: TaskHandle) {
        match (&mut self.phase, job) {
            (Phase::StartScheduled { epoch, handle }, Job::Start(scheduled))
            | (Phase::StopScheduled { epoch, handle, .. }, Job::Stop(scheduled))
                if *epoch == scheduled =>
            {
                *handle = Some(task);
            }
            _ => {}
        }
    }

    fn begin_start(&mut self, epoch: u64) -> Option<StartFn<T, E, V>> {
        match self.phase {
            Phase::StartScheduled { epoch: pending, .. } if pending == epoch => {
                self.phase = Phase::Running { session: None };
                Some(Arc::clone(&self.producer.start))
            }
            _ => None,
        }
    }

    /// Stores the session of a finished start, or hands it back if the
    /// producer was terminated meanwhile.
    fn finish_start(&mut self, session: Session) -> Option<Session> {
        match &mut self.phase {
            Phase::Running { session: slot } | Phase::StopScheduled { session: slot, .. }
                if slot.is_none() =>
            {
                *slot = Some(session);
                None
            }
            _ => Some(session),
        }
    }

    /// `Some(session)` if `epoch` is still the pending stop.
    fn begin_stop(&mut self, epoch: u64) -> Option<Option<Session>> {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::StopScheduled {
                epoch: pending,
                session,
                ..
            } if pending == epoch => {
                self.phase = Phase::Stopped;
                Some(session)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// The stream ended: cancels pending work and releases the running session.
    pub(crate) fn terminate(&mut self) -> Option<Session> {
        match mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::StartScheduled { handle, .. } => {
                if let Some(handle) = handle {
                    handle.cancel();
                }
                None
            }
            Phase::Running { session } => session,
            Phase::StopScheduled {
                handle, session, ..
            } => {
                if let Some(handle) = handle {
                    handle.cancel();
                }
                session
            }
            Phase::Idle | Phase::Stopped => None,
        }
    }
}

impl<T: Payload, E: Payload, V: Payload> Inner<T, E, V> {
    pub(crate) fn schedule(&self, job: Job) {
        let Some(scheduler) = self
            .state
            .lock()
            .lifecycle
            .as_ref()
            .map(|lifecycle| Arc::clone(&lifecycle.scheduler))
        else {
            return;
        };

        let this = Weak::clone(&self.this);
        let task = scheduler.defer(Box::new(move || {
            if let Some(inner) = this.upgrade() {
                match job {
                    Job::Start(epoch) => inner.run_start(epoch),
                    Job::Stop(epoch) => inner.run_stop(epoch),
                }
            }
        }));

        if let Some(lifecycle) = self.state.lock().lifecycle.as_mut() {
            lifecycle.track(job, task);
        }
    }

    fn run_start(&self, epoch: u64) {
        let start = {
            let mut state = self.state.lock();
            if state.ended {
                return;
            }
            match state.lifecycle.as_mut().and_then(|l| l.begin_start(epoch)) {
                Some(start) => start,
                None => return,
            }
        };

        debug!("{}: starting producer", self.id);
        let session = start(Sink::new(Weak::clone(&self.this)));

        let leftover = match self.state.lock().lifecycle.as_mut() {
            Some(lifecycle) => lifecycle.finish_start(session),
            None => Some(session),
        };
        if leftover.is_some() {
            debug!("{}: producer ended while starting", self.id);
        }
    }

    fn run_stop(&self, epoch: u64) {
        let session = {
            let mut state = self.state.lock();
            if state.ended {
                return;
            }
            match state.lifecycle.as_mut().and_then(|l| l.begin_stop(epoch)) {
                Some(session) => session,
                None => return,
            }
        };

        debug!("{}: stopping producer", self.id);
        if let Some(session) = session {
            session.close();
        }
    }
}
