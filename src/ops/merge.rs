use std::sync::Arc;

use parking_lot::Mutex;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Interleaves two sources in arrival order.
///
/// Completes only when both sources have completed; an error from either
/// source propagates immediately and terminates the merged stream,
/// releasing both upstream subscriptions.
#[derive(Clone)]
pub struct MergeOp<A, B> {
  left: A,
  right: B,
}

impl<A, B> MergeOp<A, B> {
  pub(crate) fn new(left: A, right: B) -> Self { MergeOp { left, right } }
}

impl<A, B> Observable for MergeOp<A, B>
where
  A: Observable,
  B: Observable<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<A::Item, A::Err> + Send + 'static,
  {
    let handle = Subscription::new();
    let state = Arc::new(Mutex::new(MergeState { observer: Some(observer), live: 2 }));

    let left = self
      .left
      .actual_subscribe(MergeObserver { state: state.clone(), handle: handle.clone() });
    handle.add(left);

    // The left source may already have errored synchronously; subscribing
    // the right one then would only produce dropped notifications.
    if !handle.is_closed() {
      let right = self
        .right
        .actual_subscribe(MergeObserver { state, handle: handle.clone() });
      handle.add(right);
    }
    handle
  }
}

struct MergeState<O> {
  observer: Option<O>,
  live: usize,
}

pub struct MergeObserver<O> {
  state: Arc<Mutex<MergeState<O>>>,
  handle: Subscription,
}

impl<O, Item, Err> Observer<Item, Err> for MergeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.lock();
    if let Some(observer) = &mut state.observer {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    let taken = self.state.lock().observer.take();
    if let Some(mut observer) = taken {
      observer.error(err);
    }
    self.handle.unsubscribe();
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.lock();
      state.live -= 1;
      if state.live == 0 { state.observer.take() } else { None }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.handle.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.state.lock().observer.is_none() }
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::{error::StreamError, prelude::*};

  #[test]
  fn interleaves_both_sources() {
    let values = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(AtomicBool::new(false));
    let c_values = values.clone();
    let c_completed = completed.clone();

    observable::from_iter(0..3).merge(observable::from_iter(10..13)).subscribe_all(
      move |v| c_values.lock().unwrap().push(v),
      |err: std::convert::Infallible| match err {},
      move || c_completed.store(true, Ordering::Relaxed),
    );

    // Synchronous sources drain one after the other.
    assert_eq!(*values.lock().unwrap(), vec![0, 1, 2, 10, 11, 12]);
    assert!(completed.load(Ordering::Relaxed));
  }

  #[test]
  fn completes_only_after_both_complete() {
    let completions = Arc::new(AtomicUsize::new(0));
    let c_completions = completions.clone();

    let left = Subject::<i32, std::convert::Infallible>::new();
    let right = Subject::<i32, std::convert::Infallible>::new();

    left.clone().merge(right.clone()).subscribe_all(
      |_| {},
      |err: std::convert::Infallible| match err {},
      move || {
        c_completions.fetch_add(1, Ordering::Relaxed);
      },
    );

    left.complete();
    assert_eq!(completions.load(Ordering::Relaxed), 0);
    right.complete();
    assert_eq!(completions.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn error_from_either_side_terminates() {
    let values = Arc::new(Mutex::new(vec![]));
    let errors = Arc::new(AtomicUsize::new(0));
    let c_values = values.clone();
    let c_errors = errors.clone();

    let left = Subject::<i32, StreamError>::new();
    let right = Subject::<i32, StreamError>::new();

    left.clone().merge(right.clone()).subscribe_err(
      move |v| c_values.lock().unwrap().push(v),
      move |_| {
        c_errors.fetch_add(1, Ordering::Relaxed);
      },
    );

    left.next(1);
    right.error(StreamError::Producer("right failed".into()));
    left.next(2);

    assert_eq!(*values.lock().unwrap(), vec![1]);
    assert_eq!(errors.load(Ordering::Relaxed), 1);
  }
}
