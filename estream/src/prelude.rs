// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module for convenient imports.

pub use estream_stream::prelude::*;
pub use estream_stream_time::prelude::*;

#[cfg(feature = "runtime-tokio")]
pub use crate::channel_ext::ReceiverExt;
pub use estream_runtime::ManualScheduler;
