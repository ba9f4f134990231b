// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded FIFO record of dispatched events.

use crate::event::Event;
use core::ops::{Bound, RangeBounds};
use std::collections::VecDeque;
use std::time::Instant;

/// An event together with the instant it was dispatched.
///
/// The instants let a replay reproduce the original cadence.
#[derive(Debug, Clone)]
pub struct Recorded<T, E, V> {
    pub event: Event<T, E, V>,
    pub at: Instant,
}

/// Fixed-capacity history. Once full, recording evicts the oldest entry.
///
/// A capacity of `0` disables recording entirely.
///
/// ```
/// use estream_core::{Event, History};
/// use std::time::Instant;
///
/// let mut history: History<i32, String> = History::with_capacity(2);
/// for value in 1..=3 {
///     history.record(Event::Data(value), Instant::now());
/// }
///
/// assert_eq!(history.events(), vec![Event::Data(2), Event::Data(3)]);
/// ```
#[derive(Debug, Clone)]
pub struct History<T, E, V = T> {
    capacity: usize,
    entries: VecDeque<Recorded<T, E, V>>,
}

impl<T: Clone, E: Clone, V: Clone> History<T, E, V> {
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `event`, evicting the oldest entry when over capacity.
    pub fn record(&mut self, event: Event<T, E, V>, at: Instant) {
        if !self.is_enabled() {
            return;
        }
        self.entries.push_back(Recorded { event, at });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> Vec<Event<T, E, V>> {
        self.entries.iter().map(|r| r.event.clone()).collect()
    }

    /// Retained events whose index falls in `range`. Out-of-range bounds are clamped.
    pub fn range(&self, range: impl RangeBounds<usize>) -> Vec<Event<T, E, V>> {
        let (start, end) = self.clamp(range);
        self.entries
            .range(start..end)
            .map(|r| r.event.clone())
            .collect()
    }

    /// Retained entries with their timestamps, starting at `start`.
    pub fn records_from(&self, start: usize) -> Vec<Recorded<T, E, V>> {
        self.entries.iter().skip(start).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn clamp(&self, range: impl RangeBounds<usize>) -> (usize, usize) {
        let len = self.entries.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        let end = end.min(len);
        (start.min(end), end)
    }
}
