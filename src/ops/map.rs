use std::marker::PhantomData;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

pub struct MapOp<S, F, B> {
  source: S,
  func: F,
  _marker: PhantomData<B>,
}

impl<S, F, B> MapOp<S, F, B> {
  pub(crate) fn new(source: S, func: F) -> Self {
    MapOp { source, func, _marker: PhantomData }
  }
}

impl<S: Clone, F: Clone, B> Clone for MapOp<S, F, B> {
  fn clone(&self) -> Self {
    MapOp { source: self.source.clone(), func: self.func.clone(), _marker: PhantomData }
  }
}

impl<S, F, B> Observable for MapOp<S, F, B>
where
  S: Observable,
  F: FnMut(S::Item) -> B + Send + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<B, S::Err> + Send + 'static,
  {
    self
      .source
      .actual_subscribe(MapObserver { observer, func: self.func })
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, B, Err> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) {
    let mapped = (self.func)(value);
    self.observer.next(mapped);
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
