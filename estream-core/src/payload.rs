// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Bounds shared by every value that travels through a stream.
///
/// Events are cloned into history buffers and into derived streams, and
/// subscribers may be invoked from scheduler tasks, so payloads must be
/// cloneable, thread-safe and owned.
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T> Payload for T where T: Clone + Send + Sync + 'static {}
