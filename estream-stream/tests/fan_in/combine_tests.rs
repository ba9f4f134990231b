// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{MapExt, Stream, StreamOptions};
use estream_test_utils::test_data::{animal_dog, person_alice, person_bob, TestData};
use estream_test_utils::{EventRecorder, TestError};

#[test]
fn test_combine_forwards_data_from_every_parent() -> anyhow::Result<()> {
    // Arrange
    let people: Stream<TestData> = Stream::new();
    let animals: Stream<TestData> = Stream::new();
    let all = Stream::combine([&people, &animals], StreamOptions::new());
    let recorder = EventRecorder::attach(&all);

    // Act
    people.push(person_alice());
    animals.push(animal_dog());
    people.push(person_bob());

    // Assert
    assert_eq!(
        recorder.data(),
        vec![person_alice(), animal_dog(), person_bob()]
    );
    assert_eq!(recorder.sources(), vec![people.id(), animals.id(), people.id()]);

    Ok(())
}

#[test]
fn test_combine_forwards_parent_errors_without_ending() -> anyhow::Result<()> {
    // Arrange
    let left: Stream<i32, TestError> = Stream::new();
    let right: Stream<i32, TestError> = Stream::new();
    let both = Stream::combine([&left, &right], StreamOptions::new());
    let recorder = EventRecorder::attach(&both);

    // Act
    left.error(TestError::Offline(1));
    right.push(2);

    // Assert
    assert_eq!(recorder.errors(), vec![TestError::Offline(1)]);
    assert_eq!(recorder.data(), vec![2]);
    assert!(!both.is_ended());

    Ok(())
}

#[test]
fn test_combine_without_parents_is_a_bare_stream() -> anyhow::Result<()> {
    // Arrange
    let bare: Stream<i32> = Stream::combine([], StreamOptions::new());
    let recorder = EventRecorder::attach(&bare);

    // Act
    bare.push(1);

    // Assert
    assert!(!bare.is_ended());
    assert_eq!(bare.pending_sources(), 0);
    assert_eq!(recorder.data(), vec![1]);

    Ok(())
}

#[test]
fn test_combine_counts_a_repeated_parent_once() -> anyhow::Result<()> {
    // Arrange
    let parent: Stream<i32> = Stream::new();
    let combined = Stream::combine([&parent, &parent], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);

    // Act
    parent.push(1);
    parent.end();

    // Assert
    assert_eq!(recorder.data(), vec![1]);
    assert!(combined.is_ended());

    Ok(())
}

#[test]
fn test_add_sources_builds_a_new_stream() -> anyhow::Result<()> {
    // Arrange
    let base: Stream<i32> = Stream::with_options(StreamOptions::new().history(4));
    let extra: Stream<i32> = Stream::new();

    // Act
    let combined = base.add_sources([&extra]);
    let recorder = EventRecorder::attach(&combined);
    base.push(1);
    extra.push(2);

    // Assert
    assert_ne!(combined.id(), base.id());
    assert_eq!(combined.options(), base.options());
    assert_eq!(recorder.data(), vec![1, 2]);
    assert_eq!(combined.pending_sources(), 2);

    Ok(())
}

#[test]
fn test_combine_keeps_original_source_through_operators() -> anyhow::Result<()> {
    // Arrange
    let raw: Stream<i32> = Stream::new();
    let doubled = raw.map(|value| value * 2);
    let other: Stream<i32> = Stream::new();
    let combined = Stream::combine([&doubled, &other], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);

    // Act
    raw.push(3);

    // Assert
    assert_eq!(recorder.data(), vec![6]);
    assert_eq!(recorder.sources(), vec![raw.id()]);

    Ok(())
}
