//! End-to-end scenarios across the engine: subjects, operators, disposal,
//! and the termination contract.

use std::{
  convert::Infallible,
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
  },
  thread,
  time::{Duration, Instant},
};

use ripple::prelude::*;

/// Observer that records the full notification sequence it receives.
#[derive(Clone, Default)]
struct Recording {
  notifications: Arc<Mutex<Vec<Notification<i32, StreamError>>>>,
}

impl Recording {
  fn seen(&self) -> Vec<Notification<i32, StreamError>> {
    self.notifications.lock().unwrap().clone()
  }
}

impl Observer<i32, StreamError> for Recording {
  fn next(&mut self, value: i32) {
    self
      .notifications
      .lock()
      .unwrap()
      .push(Notification::Next(value));
  }

  fn error(&mut self, err: StreamError) {
    self
      .notifications
      .lock()
      .unwrap()
      .push(Notification::Err(err));
  }

  fn complete(&mut self) {
    self
      .notifications
      .lock()
      .unwrap()
      .push(Notification::Complete);
  }
}

fn wait_until(deadline_ms: u64, mut done: impl FnMut() -> bool) {
  let deadline = Instant::now() + Duration::from_millis(deadline_ms);
  while !done() {
    assert!(Instant::now() < deadline, "timed out waiting for condition");
    thread::sleep(Duration::from_millis(1));
  }
}

#[test]
fn early_subscriber_sees_the_exact_push_sequence() {
  let recording = Recording::default();
  let subject = Subject::<i32, StreamError>::new();
  subject.clone().subscribe_with(recording.clone());

  subject.next(1);
  subject.next(2);
  subject.next(3);
  subject.complete();

  assert_eq!(
    recording.seen(),
    vec![
      Notification::Next(1),
      Notification::Next(2),
      Notification::Next(3),
      Notification::Complete,
    ]
  );
}

#[test]
fn late_subscriber_sees_only_what_follows() {
  let recording = Recording::default();
  let subject = Subject::<i32, StreamError>::new();

  subject.next(1);
  subject.clone().subscribe_with(recording.clone());
  subject.next(2);
  subject.complete();

  assert_eq!(
    recording.seen(),
    vec![Notification::Next(2), Notification::Complete]
  );
}

#[test]
fn replay_subject_hands_late_subscribers_the_tail() {
  let recording = Recording::default();
  let subject = ReplaySubject::<i32, StreamError>::with_capacity(2);

  for v in 1..=5 {
    subject.next(v);
  }
  subject.clone().subscribe_with(recording.clone());
  subject.next(6);

  assert_eq!(
    recording.seen(),
    vec![
      Notification::Next(4),
      Notification::Next(5),
      Notification::Next(6),
    ]
  );
}

#[test]
fn behavior_subject_seeds_every_subscriber() {
  let recording = Recording::default();
  let subject = BehaviorSubject::<i32, StreamError>::new(0);

  subject.clone().subscribe_with(recording.clone());

  assert_eq!(recording.seen(), vec![Notification::Next(0)]);
}

#[test]
fn async_subject_releases_only_the_last_value() {
  let before = Recording::default();
  let after = Recording::default();
  let subject = AsyncSubject::<i32, StreamError>::new();

  subject.clone().subscribe_with(before.clone());
  for v in 1..=4 {
    subject.next(v);
  }
  subject.complete();
  subject.clone().subscribe_with(after.clone());

  let expected = vec![Notification::Next(4), Notification::Complete];
  assert_eq!(before.seen(), expected);
  assert_eq!(after.seen(), expected);
}

#[test]
fn disposal_is_idempotent_down_the_whole_chain() {
  let cleanups = Arc::new(AtomicUsize::new(0));
  let c_cleanups = cleanups.clone();

  let subscription = observable::create(move |emitter: Emitter<u64, Infallible>| {
    emitter.next(1);
    let cleanups = c_cleanups.clone();
    TearDown::action(move || {
      cleanups.fetch_add(1, Ordering::Relaxed);
    })
  })
  .map(|v| v + 1)
  .subscribe(|_| {});

  subscription.unsubscribe();
  subscription.unsubscribe();
  subscription.clone().unsubscribe();

  assert_eq!(cleanups.load(Ordering::Relaxed), 1);
}

#[test]
fn take_disposes_an_infinite_interval() {
  let ticks = Arc::new(AtomicUsize::new(0));
  let completed = Arc::new(AtomicBool::new(false));
  let c_ticks = ticks.clone();
  let c_completed = completed.clone();

  observable::interval(Duration::from_millis(2))
    .take(3)
    .subscribe_all(
      move |_| {
        c_ticks.fetch_add(1, Ordering::Relaxed);
      },
      |err: Infallible| match err {},
      move || c_completed.store(true, Ordering::Relaxed),
    );

  wait_until(2_000, || completed.load(Ordering::Relaxed));
  thread::sleep(Duration::from_millis(30));
  assert_eq!(ticks.load(Ordering::Relaxed), 3);
}

#[test]
fn producer_thread_and_observer_thread_stay_ordered() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let c_seen = seen.clone();

  let subject = Subject::<i32, Infallible>::new();
  subject.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));

  let producer = {
    let subject = subject.clone();
    thread::spawn(move || {
      for v in 0..100 {
        subject.next(v);
      }
      subject.complete();
    })
  };
  producer.join().unwrap();

  let values = seen.lock().unwrap();
  assert_eq!(values.len(), 100);
  assert!(values.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn two_observers_never_see_interleaved_pushes() {
  // Both observers append to one shared log; with broadcast serialization
  // the log must contain each push's deliveries back to back.
  let log = Arc::new(Mutex::new(Vec::new()));
  let subject = Subject::<i32, Infallible>::new();

  for tag in 0..2 {
    let log = log.clone();
    subject
      .clone()
      .subscribe(move |v| log.lock().unwrap().push((v, tag)));
  }

  let pushers: Vec<_> = (0..4)
    .map(|base| {
      let subject = subject.clone();
      thread::spawn(move || {
        for v in 0..25 {
          subject.next(base * 25 + v);
        }
      })
    })
    .collect();
  for pusher in pushers {
    pusher.join().unwrap();
  }

  let log = log.lock().unwrap();
  assert_eq!(log.len(), 200);
  for pair in log.chunks(2) {
    assert_eq!(pair[0].0, pair[1].0, "a push must reach both observers before the next");
  }
}

#[test]
fn pipeline_composes_across_the_engine() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let c_seen = seen.clone();

  let subject = Subject::<i32, Infallible>::new();
  subject
    .clone()
    .filter(|v| v % 2 == 0)
    .scan(0, |acc, v| acc + v)
    .distinct_until_changed()
    .take(3)
    .subscribe(move |v| c_seen.lock().unwrap().push(v));

  for v in [0, 0, 1, 2, 2, 3, 4, 5, 6, 7, 8] {
    subject.next(v);
  }

  // Evens 0, 0, 2, 2, 4, ... fold into partial sums 0, 0, 2, 4, 8; the
  // repeated 0 collapses and take(3) ends the stream early.
  assert_eq!(*seen.lock().unwrap(), vec![0, 2, 4]);
  assert_eq!(subject.observer_count(), 0);
}

#[test]
fn failed_source_recovers_through_catch_and_retry() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let seen = Arc::new(Mutex::new(Vec::new()));
  let c_attempts = attempts.clone();
  let c_seen = seen.clone();

  let flaky = observable::create(move |emitter: Emitter<i32, StreamError>| {
    let attempt = c_attempts.fetch_add(1, Ordering::Relaxed);
    if attempt < 2 {
      emitter.error(StreamError::Producer("warming up".into()));
    } else {
      emitter.next(10);
      emitter.complete();
    }
    TearDown::None
  });

  flaky
    .retry(1)
    .catch_error(|_: StreamError| observable::of(-1))
    .subscribe(move |v| c_seen.lock().unwrap().push(v));

  // Two failures exhaust retry(1), so the fallback value arrives.
  assert_eq!(*seen.lock().unwrap(), vec![-1]);
  assert_eq!(attempts.load(Ordering::Relaxed), 2);
}

#[test]
fn guard_releases_the_subscription_at_scope_exit() {
  let subject = Subject::<i32, Infallible>::new();
  {
    let _guard = subject.clone().subscribe(|_| {}).guard();
    assert_eq!(subject.observer_count(), 1);
  }
  assert_eq!(subject.observer_count(), 0);
}

#[test]
fn dispose_racing_a_broadcast_is_safe() {
  for _ in 0..50 {
    let subject = Subject::<i32, Infallible>::new();
    let subscription = subject.clone().subscribe(|_| {});

    let pusher = {
      let subject = subject.clone();
      thread::spawn(move || {
        for v in 0..100 {
          subject.next(v);
        }
      })
    };
    let disposer = thread::spawn(move || subscription.unsubscribe());

    pusher.join().unwrap();
    disposer.join().unwrap();
    assert_eq!(subject.observer_count(), 0);
  }
}
