use std::{cmp::Eq, collections::HashSet, hash::Hash};

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Suppresses values that have been emitted before.
#[derive(Clone)]
pub struct DistinctOp<S> {
  source: S,
}

impl<S> DistinctOp<S> {
  pub(crate) fn new(source: S) -> Self { DistinctOp { source } }
}

impl<S> Observable for DistinctOp<S>
where
  S: Observable,
  S::Item: Clone + Eq + Hash + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    self
      .source
      .actual_subscribe(DistinctObserver { observer, seen: HashSet::new() })
  }
}

pub struct DistinctObserver<O, Item> {
  observer: O,
  seen: HashSet<Item>,
}

impl<O, Item, Err> Observer<Item, Err> for DistinctObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: Clone + Eq + Hash,
{
  fn next(&mut self, value: Item) {
    if self.seen.insert(value.clone()) {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Suppresses values equal to the immediately preceding emission.
///
/// The first value always passes. Equality is the item type's `PartialEq`;
/// types with exotic equality (`f64` and its NaN) get whatever their
/// `PartialEq` says.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  source: S,
}

impl<S> DistinctUntilChangedOp<S> {
  pub(crate) fn new(source: S) -> Self { DistinctUntilChangedOp { source } }
}

impl<S> Observable for DistinctUntilChangedOp<S>
where
  S: Observable,
  S::Item: Clone + PartialEq + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    self
      .source
      .actual_subscribe(DistinctUntilChangedObserver { observer, last: None })
  }
}

pub struct DistinctUntilChangedObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<O, Item, Err> Observer<Item, Err> for DistinctUntilChangedObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: Clone + PartialEq,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() == Some(&value) {
      return;
    }
    self.last = Some(value.clone());
    self.observer.next(value);
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
