// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{Event, FilterExt, Stream};
use estream_test_utils::test_data::{animal_dog, person_alice, person_bob, TestData};
use estream_test_utils::{EventRecorder, TestError};

#[test]
fn test_filter_keeps_matching_data() -> anyhow::Result<()> {
    // Arrange
    let items: Stream<TestData> = Stream::new();
    let people = items.filter(|item| matches!(item, TestData::Person { .. }));
    let recorder = EventRecorder::attach(&people);

    // Act
    items.push(person_alice());
    items.push(animal_dog());
    items.push(person_bob());

    // Assert
    assert_eq!(recorder.data(), vec![person_alice(), person_bob()]);

    Ok(())
}

#[test]
fn test_filter_passes_errors_and_end() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32, TestError> = Stream::new();
    let evens = numbers.filter(|value| value % 2 == 0);
    let recorder = EventRecorder::attach(&evens);

    // Act
    numbers.push(1);
    numbers.error(TestError::Offline(9));
    numbers.push(2);
    numbers.end();

    // Assert
    assert_eq!(
        recorder.events(),
        vec![Event::Error(TestError::Offline(9)), Event::Data(2), Event::end()]
    );

    Ok(())
}

#[test]
fn test_try_filter_reports_predicate_failures() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32, TestError> = Stream::new();
    let small = numbers.try_filter(|value| {
        if *value > 100 {
            Err(TestError::invalid("too large"))
        } else {
            Ok(*value < 10)
        }
    });
    let recorder = EventRecorder::attach(&small);

    // Act
    numbers.push(3);
    numbers.push(50);
    numbers.push(500);

    // Assert
    assert_eq!(recorder.data(), vec![3]);
    assert_eq!(recorder.errors(), vec![TestError::invalid("too large")]);

    Ok(())
}

#[test]
fn test_filter_event_drops_errors() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32, TestError> = Stream::new();
    let clean = numbers.filter_event(|event| !event.is_error());
    let recorder = EventRecorder::attach(&clean);

    // Act
    numbers.push(1);
    numbers.error(TestError::Offline(1));
    numbers.end_with(2);

    // Assert
    assert_eq!(recorder.events(), vec![Event::Data(1), Event::end_with(2)]);

    Ok(())
}

#[test]
fn test_filter_event_can_hold_the_stream_open() -> anyhow::Result<()> {
    // Arrange
    let numbers: Stream<i32> = Stream::new();
    let never_ends = numbers.filter_event(|event| !event.is_end());

    // Act
    numbers.push(1);
    numbers.end();

    // Assert
    assert!(numbers.is_ended());
    assert!(!never_ends.is_ended());
    assert_eq!(never_ends.pending_sources(), 1);

    Ok(())
}
