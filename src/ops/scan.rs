use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Emits the running fold of the source's values into an accumulator.
///
/// Every `next` folds the value in and emits the new accumulator; the seed
/// itself is never emitted, so a source with no values produces nothing
/// before its completion.
#[derive(Clone)]
pub struct ScanOp<S, F, B> {
  source: S,
  seed: B,
  func: F,
}

impl<S, F, B> ScanOp<S, F, B> {
  pub(crate) fn new(source: S, seed: B, func: F) -> Self { ScanOp { source, seed, func } }
}

impl<S, F, B> Observable for ScanOp<S, F, B>
where
  S: Observable,
  F: FnMut(B, S::Item) -> B + Send + 'static,
  B: Clone + Send + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<B, S::Err> + Send + 'static,
  {
    self.source.actual_subscribe(ScanObserver {
      observer,
      acc: self.seed,
      func: self.func,
    })
  }
}

pub struct ScanObserver<O, F, B> {
  observer: O,
  acc: B,
  func: F,
}

impl<O, F, Item, B, Err> Observer<Item, Err> for ScanObserver<O, F, B>
where
  O: Observer<B, Err>,
  F: FnMut(B, Item) -> B,
  B: Clone,
{
  fn next(&mut self, value: Item) {
    self.acc = (self.func)(self.acc.clone(), value);
    self.observer.next(self.acc.clone());
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  };

  use crate::prelude::*;

  #[test]
  fn emits_every_partial_sum() {
    let sums = Arc::new(Mutex::new(vec![]));
    let c_sums = sums.clone();

    observable::from_iter(1..=4)
      .scan(0, |acc, v| acc + v)
      .subscribe(move |v| c_sums.lock().unwrap().push(v));

    assert_eq!(*sums.lock().unwrap(), vec![1, 3, 6, 10]);
  }

  #[test]
  fn empty_source_never_emits_the_seed() {
    let hits = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(AtomicBool::new(false));
    let c_hits = hits.clone();
    let c_completed = completed.clone();

    observable::empty::<i32, _>().scan(100, |acc, v| acc + v).subscribe_all(
      move |v| c_hits.lock().unwrap().push(v),
      |err: std::convert::Infallible| match err {},
      move || c_completed.store(true, Ordering::Relaxed),
    );

    assert!(hits.lock().unwrap().is_empty());
    assert!(completed.load(Ordering::Relaxed));
  }

  #[test]
  fn accumulator_may_change_type() {
    let joined = Arc::new(Mutex::new(vec![]));
    let c_joined = joined.clone();

    observable::from_iter(["a", "b", "c"])
      .scan(String::new(), |mut acc, v| {
        acc.push_str(v);
        acc
      })
      .subscribe(move |v| c_joined.lock().unwrap().push(v));

    assert_eq!(*joined.lock().unwrap(), vec!["a", "ab", "abc"]);
  }
}
