// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A small error type for streams whose error payload is under test.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestError {
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("sensor {0} offline")]
    Offline(u32),
}

impl TestError {
    pub fn invalid(context: impl Into<String>) -> Self {
        Self::Invalid(context.into())
    }
}
