// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{Event, Stream, StreamOptions};
use estream_test_utils::EventRecorder;

#[test]
fn test_fan_in_ends_after_the_last_parent() -> anyhow::Result<()> {
    // Arrange
    let first: Stream<i32> = Stream::new();
    let second: Stream<i32> = Stream::new();
    let third: Stream<i32> = Stream::new();
    let combined = Stream::combine([&first, &second, &third], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);

    // Act
    second.end_with(2);
    first.end();
    assert!(!combined.is_ended());
    assert_eq!(combined.pending_sources(), 1);
    third.end_with(3);

    // Assert
    assert!(combined.is_ended());
    assert_eq!(recorder.end_values(), Some(vec![2, 3]));
    assert_eq!(recorder.end_count(), 1);

    Ok(())
}

#[test]
fn test_fan_in_end_values_follow_parent_end_order() -> anyhow::Result<()> {
    // Arrange
    let left: Stream<i32> = Stream::new();
    let right: Stream<i32> = Stream::new();
    let combined = Stream::combine([&left, &right], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);

    // Act
    right.end_with(20);
    left.end_with(10);

    // Assert
    assert_eq!(recorder.end_values(), Some(vec![20, 10]));

    Ok(())
}

#[test]
fn test_already_ended_parent_counts_as_ended() -> anyhow::Result<()> {
    // Arrange
    let finished: Stream<i32> = Stream::new();
    finished.end_with(99);
    let live: Stream<i32> = Stream::new();

    // Act
    let combined = Stream::combine([&finished, &live], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);
    live.end_with(1);

    // Assert
    assert_eq!(recorder.end_values(), Some(vec![1]));

    Ok(())
}

#[test]
fn test_combine_of_ended_parents_ends_immediately() -> anyhow::Result<()> {
    // Arrange
    let first: Stream<i32> = Stream::new();
    let second: Stream<i32> = Stream::new();
    first.end();
    second.end();

    // Act
    let combined = Stream::combine([&first, &second], StreamOptions::new());

    // Assert
    assert!(combined.is_ended());
    assert_eq!(combined.pending_sources(), 0);

    Ok(())
}

#[test]
fn test_direct_end_detaches_from_parents() -> anyhow::Result<()> {
    // Arrange
    let left: Stream<i32> = Stream::new();
    let right: Stream<i32> = Stream::new();
    let combined = Stream::combine([&left, &right], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);
    left.end_with(1);

    // Act
    combined.end_with(7);
    right.push(2);

    // Assert
    assert_eq!(recorder.events(), vec![Event::end_with(7)]);
    assert_eq!(left.subscriber_count(), 0);
    assert_eq!(right.subscriber_count(), 0);
    assert_eq!(combined.pending_sources(), 0);

    Ok(())
}

#[test]
fn test_parent_ending_after_direct_end_is_ignored() -> anyhow::Result<()> {
    // Arrange
    let parent: Stream<i32> = Stream::new();
    let combined = Stream::combine([&parent], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);

    // Act
    combined.end();
    parent.end_with(5);

    // Assert
    assert_eq!(recorder.end_count(), 1);
    assert_eq!(recorder.end_values(), Some(Vec::new()));

    Ok(())
}
