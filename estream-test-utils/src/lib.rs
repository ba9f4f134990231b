// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the estream crates.
//!
//! Intended for development and testing only.
//!
//! # Key Types
//!
//! - [`EventRecorder`] - subscribes to a stream and keeps every delivery
//! - [`TestData`] - fixture enum with `Person` and `Animal` variants
//! - [`TestError`] - cloneable error payload
//!
//! ```rust
//! use estream_stream::Stream;
//! use estream_test_utils::test_data::{person_alice, TestData};
//! use estream_test_utils::EventRecorder;
//!
//! let people: Stream<TestData> = Stream::new();
//! let recorder = EventRecorder::attach(&people);
//! people.push(person_alice());
//!
//! assert_eq!(recorder.data(), vec![person_alice()]);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error;
pub mod helpers;
pub mod recorder;
pub mod test_data;

pub use error::TestError;
pub use helpers::{advance_by, settle};
pub use recorder::EventRecorder;
pub use test_data::TestData;
