// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;

/// Lets tasks spawned on the current Tokio runtime run to their next await point.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Moves the paused Tokio clock forward, then settles.
///
/// Requires a runtime with the clock paused (`tokio::time::pause`).
pub async fn advance_by(millis: u64) {
    tokio::time::advance(Duration::from_millis(millis)).await;
    settle().await;
}
