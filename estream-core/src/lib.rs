// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core building blocks shared by every estream crate.
//!
//! - [`Event`]: the closed `Data | Error | End` sum type dispatched by streams
//! - [`EndValues`]: the ordered list of end values aggregated across parents
//! - [`EstreamError`]: the default error payload and the error type of fallible APIs
//! - [`StreamOptions`]: explicit per-stream configuration
//! - [`History`]: the bounded FIFO record of dispatched events

pub mod error;
pub mod event;
pub mod history;
pub mod logging;
pub mod options;
pub mod payload;
pub mod stream_id;

pub use self::error::{EstreamError, IntoEstreamError, Result, ResultExt};
pub use self::event::{EndValues, Event, EventKind};
pub use self::history::{History, Recorded};
pub use self::options::StreamOptions;
pub use self::payload::Payload;
pub use self::stream_id::StreamId;
