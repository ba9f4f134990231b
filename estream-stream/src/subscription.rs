// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use estream_core::StreamId;
use std::sync::Weak;

/// The subscriber side of a stream, with the payload types erased.
pub(crate) trait Registry: Send + Sync {
    /// Removes subscriber `key`. Returns `false` if it was not registered.
    fn remove(&self, key: u64) -> bool;

    fn contains(&self, key: u64) -> bool;
}

/// Handle bound to one subscriber of one stream.
///
/// Clones refer to the same registration. The handle holds only a weak
/// reference, so keeping it never keeps the stream alive.
#[derive(Clone)]
pub struct Subscription {
    registry: Option<Weak<dyn Registry>>,
    stream: Option<StreamId>,
    key: u64,
}

impl Subscription {
    pub(crate) fn new(registry: Weak<dyn Registry>, stream: StreamId, key: u64) -> Self {
        Self {
            registry: Some(registry),
            stream: Some(stream),
            key,
        }
    }

    /// A subscription that was never registered, returned when subscribing
    /// to a stream that has nothing left to deliver.
    #[must_use]
    pub const fn inert() -> Self {
        Self {
            registry: None,
            stream: None,
            key: 0,
        }
    }

    /// Detaches the subscriber.
    ///
    /// Returns `true` the first time, `false` on every later call and for
    /// subscribers the stream already dropped (for example after its `End`).
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|registry| registry.remove(self.key))
    }

    /// Whether the subscriber is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|registry| registry.contains(self.key))
    }

    /// The stream this subscription belongs to, `None` for an inert one.
    pub const fn stream_id(&self) -> Option<StreamId> {
        self.stream
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("stream", &self.stream)
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}
