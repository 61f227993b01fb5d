use std::marker::PhantomData;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Creates an observable that emits `value` once, then completes.
///
/// # Examples
///
/// ```
/// use ripple::prelude::*;
///
/// observable::of(123).subscribe(|v| println!("{}", v));
/// ```
pub fn of<Item, Err>(value: Item) -> OfObservable<Item, Err> {
  OfObservable { value, _marker: PhantomData }
}

#[derive(Clone)]
pub struct OfObservable<Item, Err> {
  value: Item,
  _marker: PhantomData<Err>,
}

impl<Item, Err> Observable for OfObservable<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    observer.next(self.value);
    observer.complete();
    Subscription::closed()
  }
}

/// Creates an observable that completes without emitting any value.
pub fn empty<Item, Err>() -> EmptyObservable<Item, Err> {
  EmptyObservable { _marker: PhantomData }
}

#[derive(Clone)]
pub struct EmptyObservable<Item, Err> {
  _marker: PhantomData<(Item, Err)>,
}

impl<Item, Err> Observable for EmptyObservable<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    observer.complete();
    Subscription::closed()
  }
}

/// Creates an observable that never notifies. The returned subscription is
/// still disposable.
pub fn never<Item, Err>() -> NeverObservable<Item, Err> {
  NeverObservable { _marker: PhantomData }
}

#[derive(Clone)]
pub struct NeverObservable<Item, Err> {
  _marker: PhantomData<(Item, Err)>,
}

impl<Item, Err> Observable for NeverObservable<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    drop(observer);
    Subscription::new()
  }
}

/// Creates an observable that fails with `err` immediately.
pub fn throw<Item, Err>(err: Err) -> ThrowObservable<Item, Err> {
  ThrowObservable { err, _marker: PhantomData }
}

#[derive(Clone)]
pub struct ThrowObservable<Item, Err> {
  err: Err,
  _marker: PhantomData<Item>,
}

impl<Item, Err> Observable for ThrowObservable<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    observer.error(self.err);
    Subscription::closed()
  }
}
