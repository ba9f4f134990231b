// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stream::Stream;
use estream_core::{Event, Payload};

/// Extension trait providing `end_on_error`.
pub trait EndOnErrorExt<T, E, V> {
    /// Forwards events until the first `Error`, forwards it, then ends.
    ///
    /// This is the explicit opt-in for error-terminates semantics; plain
    /// streams keep flowing after errors.
    fn end_on_error(&self) -> Stream<T, E, V>;
}

impl<T: Payload, E: Payload, V: Payload> EndOnErrorExt<T, E, V> for Stream<T, E, V> {
    fn end_on_error(&self) -> Stream<T, E, V> {
        self.derive(|event, downstream| match event {
            Event::Data(value) => downstream.push(value.clone()),
            Event::Error(error) => {
                downstream.error(error.clone());
                downstream.end();
            }
            Event::End(values) => downstream.parent_ended(values.clone()),
        })
    }
}
