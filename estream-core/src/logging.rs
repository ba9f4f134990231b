// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Conditional logging shim: uses `tracing` when enabled, compiles to nothing otherwise.
//!
//! Call sites only use plain format strings so both expansions accept them.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __estream_log_noop {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
pub use crate::__estream_log_noop as debug;

#[cfg(not(feature = "tracing"))]
pub use crate::__estream_log_noop as trace;

#[cfg(not(feature = "tracing"))]
pub use crate::__estream_log_noop as warn;
