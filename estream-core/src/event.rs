// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::EstreamError;
use core::ops::Deref;

/// One of the three things a stream can dispatch.
///
/// `Error` events are informational: only `End` terminates a stream. Once an
/// `End` has been dispatched the stream never dispatches anything again.
///
/// The end values carry their own type parameter `V` because transforming
/// combinators such as `map` change the data type while passing the parent's
/// end values through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<T, E = EstreamError, V = T> {
    /// A single payload.
    Data(T),
    /// An error payload. Does not terminate the stream.
    Error(E),
    /// Terminal event, one entry per terminating parent that supplied a value.
    End(EndValues<V>),
}

/// The discriminant of an [`Event`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Data,
    Error,
    End,
}

impl<T, E, V> Event<T, E, V> {
    /// Builds an `End` carrying no values.
    #[must_use]
    pub fn end() -> Self {
        Self::End(EndValues::empty())
    }

    /// Builds an `End` carrying exactly one value.
    #[must_use]
    pub fn end_with(value: V) -> Self {
        Self::End(EndValues::single(value))
    }

    /// Returns `true` if this is a `Data` event.
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Returns `true` if this is an `Error` event.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns `true` if this is an `End` event.
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End(_))
    }

    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Data(_) => EventKind::Data,
            Self::Error(_) => EventKind::Error,
            Self::End(_) => EventKind::End,
        }
    }

    pub const fn as_data(&self) -> Option<&T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_error(&self) -> Option<&E> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    pub const fn as_end(&self) -> Option<&EndValues<V>> {
        match self {
            Self::End(values) => Some(values),
            _ => None,
        }
    }

    /// Converts into the data payload, discarding errors and ends.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the data payload, leaving `Error` and `End` untouched.
    pub fn map_data<U, F>(self, f: F) -> Event<U, E, V>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Data(value) => Event::Data(f(value)),
            Self::Error(error) => Event::Error(error),
            Self::End(values) => Event::End(values),
        }
    }

    /// Maps the event with a fallible function; an `Err` becomes an `Error` event.
    pub fn and_then<U, F>(self, f: F) -> Event<U, E, V>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        match self {
            Self::Data(value) => match f(value) {
                Ok(mapped) => Event::Data(mapped),
                Err(error) => Event::Error(error),
            },
            Self::Error(error) => Event::Error(error),
            Self::End(values) => Event::End(values),
        }
    }
}

impl<T, E, V> From<Result<T, E>> for Event<T, E, V> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Data(value),
            Err(error) => Self::Error(error),
        }
    }
}

/// Ordered end values of a terminal event.
///
/// A stream with several parents concatenates each parent's end values, in
/// the order the parents terminate, before it dispatches its own `End`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndValues<V>(Vec<V>);

impl<V> EndValues<V> {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn single(value: V) -> Self {
        Self(vec![value])
    }

    /// Appends `other` after the values already collected.
    pub fn concat(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn into_vec(self) -> Vec<V> {
        self.0
    }
}

impl<V> Default for EndValues<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V> Deref for EndValues<V> {
    type Target = [V];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<V> From<Vec<V>> for EndValues<V> {
    fn from(values: Vec<V>) -> Self {
        Self(values)
    }
}

impl<V> From<Option<V>> for EndValues<V> {
    fn from(value: Option<V>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl<V> IntoIterator for EndValues<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a EndValues<V> {
    type Item = &'a V;
    type IntoIter = core::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
