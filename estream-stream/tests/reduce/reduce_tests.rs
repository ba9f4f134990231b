// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{ReduceExt, Stream, StreamOptions};
use estream_test_utils::{EventRecorder, TestError};

#[test]
fn test_reduce_emits_only_the_final_value() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let total = numbers.reduce(0i32, |acc, value| acc + value);
    let recorder = EventRecorder::attach(&total);

    // Act
    for value in 1..=4 {
        numbers.push(value);
    }
    assert!(recorder.is_empty());
    numbers.end();

    // Assert
    assert!(recorder.data().is_empty());
    assert_eq!(recorder.end_values(), Some(vec![10]));

    Ok(())
}

#[test]
fn test_reduce_folds_end_values_in() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let total = numbers.reduce(0i32, |acc, value| acc + value);
    let recorder = EventRecorder::attach(&total);

    // Act
    numbers.push(1);
    numbers.end_with(5);

    // Assert
    assert_eq!(recorder.end_values(), Some(vec![6]));

    Ok(())
}

#[test]
fn test_reduce_without_data_ends_with_the_seed() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let product = numbers.reduce(1, |acc, value| acc * value);
    let recorder = EventRecorder::attach(&product);

    // Act
    numbers.end();

    // Assert
    assert_eq!(recorder.end_values(), Some(vec![1]));

    Ok(())
}

#[test]
fn test_reduce_forwards_errors_and_keeps_accumulating() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32, TestError> = Stream::new();
    let total = numbers.reduce(0i32, |acc, value| acc + value);
    let recorder = EventRecorder::attach(&total);

    // Act
    numbers.push(2);
    numbers.error(TestError::Offline(1));
    numbers.push(3);
    numbers.end();

    // Assert
    assert_eq!(recorder.errors(), vec![TestError::Offline(1)]);
    assert_eq!(recorder.end_values(), Some(vec![5]));

    Ok(())
}

#[test]
fn test_reduce_over_a_fan_in_stream() -> anyhow::Result<()> {
    // Arrange
    let left: Stream<i32> = Stream::new();
    let right: Stream<i32> = Stream::new();
    let both = Stream::combine([&left, &right], StreamOptions::new());
    let max = both.reduce(i32::MIN, |acc, value| *acc.max(value));
    let recorder = EventRecorder::attach(&max);

    // Act
    left.push(3);
    right.push(9);
    left.end_with(4);
    assert!(recorder.is_empty());
    right.end();

    // Assert
    assert_eq!(recorder.end_values(), Some(vec![9]));

    Ok(())
}
