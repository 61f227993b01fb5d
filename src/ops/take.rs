use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Emits only the first `count` values from the source, then completes.
///
/// Once its quota is reached, `take` synthesizes `complete` and releases
/// the upstream subscription, so an unbounded producer behind it stops
/// doing work.
#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<S> Observable for TakeOp<S>
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    if self.count == 0 {
      observer.complete();
      return Subscription::closed();
    }
    let handle = Subscription::new();
    let upstream = self.source.actual_subscribe(TakeObserver {
      observer: Some(observer),
      remaining: self.count,
      handle: handle.clone(),
    });
    handle.add(upstream);
    handle
  }
}

pub struct TakeObserver<O> {
  observer: Option<O>,
  remaining: usize,
  handle: Subscription,
}

impl<O, Item, Err> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let Some(observer) = &mut self.observer else { return };
    observer.next(value);
    self.remaining -= 1;
    if self.remaining == 0 {
      if let Some(mut observer) = self.observer.take() {
        observer.complete();
      }
      self.handle.unsubscribe();
    }
  }

  fn error(&mut self, err: Err) {
    if let Some(mut observer) = self.observer.take() {
      observer.error(err);
    }
    self.handle.unsubscribe();
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.observer.take() {
      observer.complete();
    }
    self.handle.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.observer.is_none() || self.handle.is_closed() }
}

/// Forwards values while the predicate holds, then completes and releases
/// the upstream subscription.
#[derive(Clone)]
pub struct TakeWhileOp<S, F> {
  source: S,
  predicate: F,
}

impl<S, F> TakeWhileOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self { TakeWhileOp { source, predicate } }
}

impl<S, F> Observable for TakeWhileOp<S, F>
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
    let handle = Subscription::new();
    let upstream = self.source.actual_subscribe(TakeWhileObserver {
      observer: Some(observer),
      predicate: self.predicate,
      handle: handle.clone(),
    });
    handle.add(upstream);
    handle
  }
}

pub struct TakeWhileObserver<O, F> {
  observer: Option<O>,
  predicate: F,
  handle: Subscription,
}

impl<O, F, Item, Err> Observer<Item, Err> for TakeWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    let Some(observer) = &mut self.observer else { return };
    if (self.predicate)(&value) {
      observer.next(value);
      return;
    }
    if let Some(mut observer) = self.observer.take() {
      observer.complete();
    }
    self.handle.unsubscribe();
  }

  fn error(&mut self, err: Err) {
    if let Some(mut observer) = self.observer.take() {
      observer.error(err);
    }
    self.handle.unsubscribe();
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.observer.take() {
      observer.complete();
    }
    self.handle.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.observer.is_none() || self.handle.is_closed() }
}
