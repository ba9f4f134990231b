// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Take operator: limits a stream to its first `n` data events.
//!
//! Only `Data` counts towards the limit; errors pass through uncounted.
//! After the `n`-th value the derived stream ends with no end value and
//! unsubscribes from its parent, which lets a producer-backed parent stop.
//! `take(0)` ends immediately.
//!
//! # Examples
//!
//! ```
//! use estream_stream::{Stream, TakeExt};
//! use std::sync::{Arc, Mutex};
//!
//! let numbers: Stream<i32> = Stream::new();
//! let first_two = numbers.take(2);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! first_two.on_data(move |value, _| sink.lock().unwrap().push(*value));
//!
//! for value in 1..=3 {
//!     numbers.push(value);
//! }
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! assert!(first_two.is_ended());
//! assert_eq!(numbers.subscriber_count(), 0);
//! ```

use crate::stream::Stream;
use estream_core::Payload;
use parking_lot::Mutex;
use std::sync::Arc;

/// Extension trait providing the `take` operator.
pub trait TakeExt<T, E, V> {
    /// Forwards the first `n` data events, then ends.
    ///
    /// See the [module-level documentation](crate::take) for details.
    fn take(&self, n: usize) -> Stream<T, E, V>;
}

impl<T: Payload, E: Payload, V: Payload> TakeExt<T, E, V> for Stream<T, E, V> {
    fn take(&self, n: usize) -> Stream<T, E, V> {
        let remaining = Arc::new(Mutex::new(n));
        let taken = self.derive(move |event, downstream| {
            let Some(value) = downstream.relay(event) else {
                return;
            };
            let last = {
                let mut remaining = remaining.lock();
                if *remaining == 0 {
                    return;
                }
                *remaining -= 1;
                *remaining == 0
            };
            downstream.push(value.clone());
            if last {
                downstream.end();
            }
        });
        if n == 0 {
            taken.end();
        }
        taken
    }
}
