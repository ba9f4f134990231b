// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use estream_stream::{MapExt, ManualScheduler, Producer, Sink, Stream, StreamOptions, TakeExt};
use estream_test_utils::EventRecorder;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts starts and stops and keeps the latest sink so tests can push later.
struct ProducerSpy {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    sink: Arc<Mutex<Option<Sink<i32>>>>,
}

impl ProducerSpy {
    fn new() -> Self {
        Self {
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
            sink: Arc::new(Mutex::new(None)),
        }
    }

    fn restartable(&self) -> Producer<i32> {
        let starts = Arc::clone(&self.starts);
        let stops = Arc::clone(&self.stops);
        let slot = Arc::clone(&self.sink);
        Producer::with_stop(
            move |sink: Sink<i32>| {
                let run = starts.fetch_add(1, Ordering::SeqCst) + 1;
                *slot.lock() = Some(sink);
                run
            },
            move |_run: usize| {
                stops.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    fn one_shot(&self) -> Producer<i32> {
        let starts = Arc::clone(&self.starts);
        let slot = Arc::clone(&self.sink);
        Producer::new(move |sink: Sink<i32>| {
            starts.fetch_add(1, Ordering::SeqCst);
            *slot.lock() = Some(sink);
        })
    }

    fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn push(&self, value: i32) {
        if let Some(sink) = self.sink.lock().as_ref() {
            sink.push(value);
        }
    }

    fn end(&self) {
        if let Some(sink) = self.sink.lock().as_ref() {
            sink.end();
        }
    }
}

fn stream_on(scheduler: &ManualScheduler, producer: Producer<i32>) -> Stream<i32> {
    Stream::from_producer_on(producer, StreamOptions::new(), Arc::new(scheduler.clone()))
}

#[test]
fn test_start_waits_for_the_next_turn() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());

    // Act
    let recorder = EventRecorder::attach(&stream);

    // Assert
    assert_eq!(spy.starts(), 0);
    scheduler.run_until_idle();
    assert_eq!(spy.starts(), 1);
    spy.push(5);
    assert_eq!(recorder.data(), vec![5]);

    Ok(())
}

#[test]
fn test_nothing_starts_without_subscribers() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let _stream = stream_on(&scheduler, spy.restartable());

    // Act
    scheduler.run_until_idle();

    // Assert
    assert_eq!(spy.starts(), 0);
    assert_eq!(scheduler.pending_tasks(), 0);

    Ok(())
}

#[test]
fn test_subscribers_in_the_same_turn_share_one_start() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());

    // Act
    let first = EventRecorder::attach(&stream);
    let second = EventRecorder::attach(&stream);
    scheduler.run_until_idle();
    spy.push(1);

    // Assert
    assert_eq!(spy.starts(), 1);
    assert_eq!(first.data(), vec![1]);
    assert_eq!(second.data(), vec![1]);

    Ok(())
}

#[test]
fn test_unsubscribing_before_start_cancels_it() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let recorder = EventRecorder::attach(&stream);

    // Act
    recorder.detach();
    scheduler.run_until_idle();

    // Assert
    assert_eq!(spy.starts(), 0);
    assert_eq!(spy.stops(), 0);

    Ok(())
}

#[test]
fn test_last_unsubscribe_schedules_stop() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let first = EventRecorder::attach(&stream);
    let second = EventRecorder::attach(&stream);
    scheduler.run_until_idle();

    // Act
    first.detach();
    scheduler.run_until_idle();
    assert_eq!(spy.stops(), 0);
    second.detach();
    assert_eq!(spy.stops(), 0);
    scheduler.run_until_idle();

    // Assert
    assert_eq!(spy.stops(), 1);
    assert!(!stream.is_ended());

    Ok(())
}

#[test]
fn test_resubscribing_before_stop_keeps_the_producer_running() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let first = EventRecorder::attach(&stream);
    scheduler.run_until_idle();

    // Act
    first.detach();
    let second = EventRecorder::attach(&stream);
    scheduler.run_until_idle();
    spy.push(3);

    // Assert
    assert_eq!(spy.starts(), 1);
    assert_eq!(spy.stops(), 0);
    assert_eq!(second.data(), vec![3]);

    Ok(())
}

#[test]
fn test_producer_with_stop_restarts_for_new_subscribers() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let first = EventRecorder::attach(&stream);
    scheduler.run_until_idle();
    first.detach();
    scheduler.run_until_idle();

    // Act
    let second = EventRecorder::attach(&stream);
    scheduler.run_until_idle();
    spy.push(8);

    // Assert
    assert_eq!(spy.starts(), 2);
    assert_eq!(spy.stops(), 1);
    assert_eq!(second.data(), vec![8]);

    Ok(())
}

#[test]
fn test_producer_without_stop_is_not_restarted() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.one_shot());
    let first = EventRecorder::attach(&stream);
    scheduler.run_until_idle();
    first.detach();
    scheduler.run_until_idle();

    // Act
    let _second = EventRecorder::attach(&stream);
    scheduler.run_until_idle();

    // Assert
    assert_eq!(spy.starts(), 1);
    assert!(!Producer::<i32>::new(|_sink: Sink<i32>| ()).is_restartable());

    Ok(())
}

#[test]
fn test_producer_ending_the_stream_skips_stop() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let recorder = EventRecorder::attach(&stream);
    scheduler.run_until_idle();

    // Act
    spy.push(1);
    spy.end();
    scheduler.run_until_idle();

    // Assert
    assert!(stream.is_ended());
    assert_eq!(recorder.data(), vec![1]);
    assert_eq!(recorder.end_count(), 1);
    assert_eq!(spy.stops(), 0);

    Ok(())
}

#[test]
fn test_sink_is_closed_after_end() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let _recorder = EventRecorder::attach(&stream);
    scheduler.run_until_idle();
    let sink = spy.sink.lock().clone();

    // Act
    stream.end();

    // Assert
    let sink = sink.ok_or_else(|| anyhow::anyhow!("producer never started"))?;
    assert!(sink.is_closed());
    assert_eq!(sink.stream_id(), Some(stream.id()));
    sink.push(2);

    Ok(())
}

#[test]
fn test_producer_start_runs_synchronous_pushes() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let producer: Producer<i32> = Producer::new(|sink: Sink<i32>| {
        for value in 1..=3 {
            sink.push(value);
        }
        sink.end_with(0);
    });
    let stream = stream_on(&scheduler, producer);
    let recorder = EventRecorder::attach(&stream);

    // Act
    scheduler.run_until_idle();

    // Assert
    assert_eq!(recorder.data(), vec![1, 2, 3]);
    assert_eq!(recorder.end_values(), Some(vec![0]));

    Ok(())
}

#[test]
fn test_take_lets_the_producer_stop() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let first_two = stream.take(2);
    let recorder = EventRecorder::attach(&first_two);
    scheduler.run_until_idle();

    // Act
    spy.push(1);
    spy.push(2);
    scheduler.run_until_idle();

    // Assert
    assert_eq!(recorder.data(), vec![1, 2]);
    assert!(first_two.is_ended());
    assert_eq!(stream.subscriber_count(), 0);
    assert_eq!(spy.stops(), 1);

    Ok(())
}

#[test]
fn test_unsubscribing_from_combine_stops_every_producer() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let (left_spy, right_spy) = (ProducerSpy::new(), ProducerSpy::new());
    let left = stream_on(&scheduler, left_spy.restartable());
    let right = stream_on(&scheduler, right_spy.restartable());
    let combined = Stream::combine([&left, &right], StreamOptions::new());
    let recorder = EventRecorder::attach(&combined);
    scheduler.run_until_idle();
    left_spy.push(1);
    right_spy.push(2);

    // Act
    recorder.detach();
    scheduler.run_until_idle();

    // Assert
    assert_eq!(recorder.data(), vec![1, 2]);
    assert_eq!(left_spy.stops(), 1);
    assert_eq!(right_spy.stops(), 1);
    assert_eq!(left.subscriber_count(), 0);
    assert_eq!(right.subscriber_count(), 0);
    assert_eq!(combined.pending_sources(), 2);
    assert!(!combined.is_ended());

    Ok(())
}

#[test]
fn test_resubscribing_to_combine_restarts_the_producers() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let (left_spy, right_spy) = (ProducerSpy::new(), ProducerSpy::new());
    let left = stream_on(&scheduler, left_spy.restartable());
    let right = stream_on(&scheduler, right_spy.restartable());
    let combined = Stream::combine([&left, &right], StreamOptions::new());
    let first = EventRecorder::attach(&combined);
    scheduler.run_until_idle();
    first.detach();
    scheduler.run_until_idle();

    // Act
    let second = EventRecorder::attach(&combined);
    scheduler.run_until_idle();
    left_spy.push(3);
    right_spy.push(4);

    // Assert
    assert_eq!(left_spy.starts(), 2);
    assert_eq!(right_spy.starts(), 2);
    assert_eq!(left.subscriber_count(), 1);
    assert_eq!(second.data(), vec![3, 4]);
    assert!(first.is_empty());

    Ok(())
}

#[test]
fn test_unsubscribing_from_a_map_chain_stops_the_producer() -> anyhow::Result<()> {
    // Arrange
    let scheduler = ManualScheduler::new();
    let spy = ProducerSpy::new();
    let stream = stream_on(&scheduler, spy.restartable());
    let doubled = stream.map(|value| value * 2);
    let labelled = doubled.map(|value| format!("#{value}"));
    let recorder = EventRecorder::attach(&labelled);
    scheduler.run_until_idle();
    spy.push(1);

    // Act
    recorder.detach();
    scheduler.run_until_idle();

    // Assert
    assert_eq!(recorder.data(), vec!["#2".to_string()]);
    assert_eq!(doubled.subscriber_count(), 0);
    assert_eq!(stream.subscriber_count(), 0);
    assert_eq!(spy.stops(), 1);

    Ok(())
}

#[test]
fn test_detached_child_releases_its_parent_registration() -> anyhow::Result<()> {
    // Arrange
    let parent: Stream<i32> = Stream::new();
    let child = parent.map(|value| value + 1);
    let recorder = EventRecorder::attach(&child);
    assert_eq!(parent.subscriber_count(), 1);

    // Act
    recorder.detach();
    drop(child);
    parent.push(1);

    // Assert
    assert_eq!(parent.subscriber_count(), 0);
    assert!(recorder.is_empty());

    Ok(())
}

#[test]
fn test_parent_ending_while_detached_ends_the_child_on_resubscribe() -> anyhow::Result<()> {
    // Arrange
    let left: Stream<i32> = Stream::new();
    let right: Stream<i32> = Stream::new();
    let combined = Stream::combine([&left, &right], StreamOptions::new());
    let first = EventRecorder::attach(&combined);
    first.detach();
    left.end_with(1);
    assert!(!combined.is_ended());

    // Act
    let recorder = EventRecorder::attach(&combined);
    right.push(2);
    right.end_with(3);

    // Assert
    assert_eq!(recorder.data(), vec![2]);
    assert_eq!(recorder.end_values(), Some(vec![3]));
    assert!(combined.is_ended());

    Ok(())
}
