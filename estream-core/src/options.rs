// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-stream construction options.
//!
//! Options are passed explicitly to every constructor; there are no process
//! wide defaults to mutate.
//!
//! ```
//! use estream_core::StreamOptions;
//!
//! let options = StreamOptions::new().history(16).start_flowing(false);
//! assert_eq!(options.history, 16);
//! assert!(!options.start_flowing);
//! assert!(!options.buffer);
//! ```

#[cfg(feature = "serde")]
use crate::error::{EstreamError, Result};

/// Configuration recognised by every stream constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StreamOptions {
    /// Capacity of the history buffer. `0` disables history.
    ///
    /// When loaded from configuration, `true` means unbounded and `false` means disabled.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "history_setting::deserialize")
    )]
    pub history: usize,

    /// When `false`, events emitted before the first subscriber attaches are
    /// held and delivered to that subscriber instead of being dropped.
    pub start_flowing: bool,

    /// When `true`, events dispatched while the stream has no subscribers are
    /// kept and flushed to the next subscriber on the following scheduler turn.
    /// The buffer survives the stream's `End`.
    pub buffer: bool,
}

impl StreamOptions {
    /// History and buffering disabled, flowing from the start.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history: 0,
            start_flowing: true,
            buffer: false,
        }
    }

    /// Sets the history capacity.
    #[must_use]
    pub const fn history(mut self, capacity: usize) -> Self {
        self.history = capacity;
        self
    }

    /// Keeps every event ever dispatched.
    #[must_use]
    pub const fn unbounded_history(mut self) -> Self {
        self.history = usize::MAX;
        self
    }

    #[must_use]
    pub const fn start_flowing(mut self, flowing: bool) -> Self {
        self.start_flowing = flowing;
        self
    }

    /// Enables or disables buffering of events nobody was subscribed to.
    #[must_use]
    pub const fn buffer(mut self, buffering: bool) -> Self {
        self.buffer = buffering;
        self
    }

    pub const fn keeps_history(&self) -> bool {
        self.history > 0
    }

    /// Parses options from a JSON document, e.g. a section of a config file.
    ///
    /// Missing keys fall back to [`StreamOptions::default`].
    ///
    /// ```
    /// use estream_core::StreamOptions;
    ///
    /// let options = StreamOptions::from_json(r#"{ "history": 4 }"#).unwrap();
    /// assert_eq!(options, StreamOptions::new().history(4));
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| EstreamError::invalid_options(e.to_string()))
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde")]
mod history_setting {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HistorySetting {
        Enabled(bool),
        Capacity(usize),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match HistorySetting::deserialize(deserializer)? {
            HistorySetting::Enabled(true) => usize::MAX,
            HistorySetting::Enabled(false) => 0,
            HistorySetting::Capacity(capacity) => capacity,
        })
    }
}
