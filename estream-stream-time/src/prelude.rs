// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based operator traits with one import.

pub use crate::debounce::DebounceExt;
pub use crate::replay::{ReplayExt, ReplayHandle};
