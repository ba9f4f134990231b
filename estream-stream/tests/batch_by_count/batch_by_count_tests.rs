// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{BatchByCountExt, Event, Stream};
use estream_test_utils::{EventRecorder, TestError};

#[test]
fn test_batch_by_count_emits_full_batches() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let triples = numbers.batch_by_count(3);
    let recorder = EventRecorder::attach(&triples);

    // Act
    for value in 1..=7 {
        numbers.push(value);
    }

    // Assert
    assert_eq!(recorder.data(), vec![vec![1, 2, 3], vec![4, 5, 6]]);

    Ok(())
}

#[test]
fn test_batch_by_count_discards_partial_batch_at_end() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let pairs = numbers.batch_by_count(2);
    let recorder = EventRecorder::attach(&pairs);

    // Act
    numbers.push(1);
    numbers.push(2);
    numbers.push(3);
    numbers.end();

    // Assert
    assert_eq!(
        recorder.events(),
        vec![Event::Data(vec![1, 2]), Event::end()]
    );

    Ok(())
}

#[test]
fn test_batch_by_count_of_zero_behaves_as_one() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let singles = numbers.batch_by_count(0);
    let recorder = EventRecorder::attach(&singles);

    // Act
    numbers.push(1);
    numbers.push(2);

    // Assert
    assert_eq!(recorder.data(), vec![vec![1], vec![2]]);

    Ok(())
}

#[test]
fn test_batch_by_count_passes_errors_without_breaking_the_batch() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32, TestError> = Stream::new();
    let pairs = numbers.batch_by_count(2);
    let recorder = EventRecorder::attach(&pairs);

    // Act
    numbers.push(1);
    numbers.error(TestError::Offline(2));
    numbers.push(3);

    // Assert
    assert_eq!(
        recorder.events(),
        vec![Event::Error(TestError::Offline(2)), Event::Data(vec![1, 3])]
    );

    Ok(())
}
