// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{Stream, StreamOptions, Subscriber, Subscription};
use estream_test_utils::EventRecorder;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_unsubscribe_stops_delivery() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let recorder = EventRecorder::attach(&stream);
    stream.push(1);

    // Act
    let first = recorder.detach();
    let second = recorder.detach();
    stream.push(2);

    // Assert
    assert!(first);
    assert!(!second);
    assert_eq!(recorder.data(), vec![1]);
    assert_eq!(stream.subscriber_count(), 0);

    Ok(())
}

#[test]
fn test_subscriber_added_during_dispatch_sees_only_later_events() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let late = Arc::new(Mutex::new(Vec::new()));
    let added = Arc::new(Mutex::new(false));

    let target = stream.clone();
    let late_sink = Arc::clone(&late);
    stream.on(move |_| {
        let mut added = added.lock();
        if *added {
            return;
        }
        *added = true;
        let late_sink = Arc::clone(&late_sink);
        target.on_data(move |value, _| late_sink.lock().push(*value));
    });

    // Act
    stream.push(1);
    stream.push(2);

    // Assert
    assert_eq!(*late.lock(), vec![2]);

    Ok(())
}

#[test]
fn test_unsubscribe_during_dispatch_takes_effect_on_next_event() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let handle = Arc::clone(&victim);
    stream.on(move |_| {
        if let Some(subscription) = handle.lock().as_ref() {
            subscription.unsubscribe();
        }
    });
    let recorder = EventRecorder::attach(&stream);
    *victim.lock() = Some(recorder.subscription().clone());

    // Act
    stream.push(1);
    stream.push(2);

    // Assert
    assert_eq!(recorder.data(), vec![1]);
    assert_eq!(stream.subscriber_count(), 1);

    Ok(())
}

#[test]
fn test_subscriber_can_detach_itself() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    stream.on(move |emission| {
        counter.fetch_add(1, Ordering::SeqCst);
        emission.subscription().unsubscribe();
    });

    // Act
    stream.push(1);
    stream.push(2);

    // Assert
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(stream.subscriber_count(), 0);

    Ok(())
}

#[test]
fn test_shared_subscriber_is_registered_once() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let callback: Subscriber<i32> = Arc::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // Act
    let first = stream.subscribe_shared(Arc::clone(&callback));
    let second = stream.subscribe_shared(callback);
    stream.push(1);

    // Assert
    assert_eq!(stream.subscriber_count(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(first.unsubscribe());
    assert!(!second.is_active());

    Ok(())
}

#[test]
fn test_off_removes_a_shared_subscriber_by_identity() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let callback: Subscriber<i32> = Arc::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let other: Subscriber<i32> = Arc::new(|_| {});
    let subscription = stream.subscribe_shared(Arc::clone(&callback));

    // Act
    let removed = stream.off(&callback);
    stream.push(1);

    // Assert
    assert!(removed);
    assert!(!stream.off(&callback));
    assert!(!stream.off(&other));
    assert!(!subscription.is_active());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[test]
fn test_subscribing_to_an_ended_stream_without_history_is_inert() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    stream.end();

    // Act
    let subscription = stream.on(|_| {});

    // Assert
    assert!(!subscription.is_active());
    assert_eq!(subscription.stream_id(), None);
    assert!(!subscription.unsubscribe());
    assert_eq!(stream.subscriber_count(), 0);

    Ok(())
}

#[test]
fn test_subscribing_to_an_ended_stream_with_history_registers() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::with_options(StreamOptions::new().history(4));
    stream.push(1);
    stream.end();

    // Act
    let subscription = stream.on(|_| {});

    // Assert
    assert!(subscription.is_active());
    assert_eq!(subscription.stream_id(), Some(stream.id()));

    Ok(())
}

#[test]
fn test_dropped_stream_leaves_subscription_inactive() -> anyhow::Result<()> {
    // Arrange
    let stream: Stream<i32> = Stream::new();
    let subscription = stream.on(|_| {});

    // Act
    drop(stream);

    // Assert
    assert!(!subscription.is_active());
    assert!(!subscription.unsubscribe());

    Ok(())
}
