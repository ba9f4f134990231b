// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Everything needed to build and chain streams with one import.
//!
//! ```
//! use estream_stream::prelude::*;
//!
//! let source: Stream<i32> = Stream::new();
//! let _evens = source.filter(|v| v % 2 == 0).take(3);
//! ```

pub use crate::batch_by_count::BatchByCountExt;
pub use crate::end_on_error::EndOnErrorExt;
pub use crate::fill::FillExt;
pub use crate::filter::FilterExt;
pub use crate::fmap::FmapExt;
pub use crate::into_async_stream::IntoAsyncStream;
pub use crate::map::MapExt;
pub use crate::merge_latest::MergeLatestExt;
pub use crate::reduce::ReduceExt;
pub use crate::scan::ScanExt;
pub use crate::take::TakeExt;
pub use crate::take_until::TakeUntilExt;

pub use crate::lifecycle::{Producer, Sink};
pub use crate::stream::Stream;
pub use crate::subscription::Subscription;
pub use estream_core::{EndValues, EstreamError, Event, EventKind, StreamOptions};
