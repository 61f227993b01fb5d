use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Drops the first `count` values from the source, forwarding the rest.
#[derive(Clone)]
pub struct SkipOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { SkipOp { source, count } }
}

impl<S> Observable for SkipOp<S>
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    self
      .source
      .actual_subscribe(SkipObserver { observer, remaining: self.count })
  }
}

pub struct SkipObserver<O> {
  observer: O,
  remaining: usize,
}

impl<O, Item, Err> Observer<Item, Err> for SkipObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
      return;
    }
    self.observer.next(value);
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Drops values while the predicate holds, then forwards everything.
#[derive(Clone)]
pub struct SkipWhileOp<S, F> {
  source: S,
  predicate: F,
}

impl<S, F> SkipWhileOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self { SkipWhileOp { source, predicate } }
}

impl<S, F> Observable for SkipWhileOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    self.source.actual_subscribe(SkipWhileObserver {
      observer,
      predicate: self.predicate,
      skipping: true,
    })
  }
}

pub struct SkipWhileObserver<O, F> {
  observer: O,
  predicate: F,
  skipping: bool,
}

impl<O, F, Item, Err> Observer<Item, Err> for SkipWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.skipping {
      if (self.predicate)(&value) {
        return;
      }
      self.skipping = false;
    }
    self.observer.next(value);
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn drops_the_first_n() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::from_iter(0..6)
      .skip(4)
      .subscribe(move |v| c_values.lock().unwrap().push(v));

    assert_eq!(*values.lock().unwrap(), vec![4, 5]);
  }

  #[test]
  fn skip_more_than_available_is_empty() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::from_iter(0..3)
      .skip(10)
      .subscribe(move |v: i32| c_values.lock().unwrap().push(v));

    assert!(values.lock().unwrap().is_empty());
  }

  #[test]
  fn skip_then_take_windows_the_middle() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::range(10, 10)
      .skip(1)
      .take(2)
      .subscribe(move |v| c_values.lock().unwrap().push(v));

    assert_eq!(*values.lock().unwrap(), vec![11, 12]);
  }

  #[test]
  fn skip_while_resumes_for_good() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::from_iter([-2, -1, 0, 1, -5])
      .skip_while(|v| *v < 0)
      .subscribe(move |v| c_values.lock().unwrap().push(v));

    // Once the predicate fails, later matching values still flow.
    assert_eq!(*values.lock().unwrap(), vec![0, 1, -5]);
  }
}
