//! Boundary wrappers that enforce the terminal contract.
//!
//! `Subscriber` sits between an upstream source and the observer a caller
//! handed to `subscribe`; `ObserverSlot` is the disposable cell that hot
//! sources and adapters park a boxed observer in.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
  observer::{BoxObserver, Observer},
  subscription::Subscription,
};

/// Wraps the observer handed to a subscribe call.
///
/// Per subscription it guarantees: values stop flowing once the handle is
/// disposed, at most one terminal notification is delivered, and a
/// terminal notification disposes the whole upstream chain.
pub struct Subscriber<O> {
  observer: Option<O>,
  subscription: Subscription,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O, subscription: Subscription) -> Self {
    Subscriber { observer: Some(observer), subscription }
  }
}

impl<O, Item, Err> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.subscription.is_closed() {
      self.observer = None;
      return;
    }
    if let Some(observer) = &mut self.observer {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if let Some(mut observer) = self.observer.take() {
      if !self.subscription.is_closed() {
        observer.error(err);
      }
    }
    self.subscription.unsubscribe();
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.observer.take() {
      if !self.subscription.is_closed() {
        observer.complete();
      }
    }
    self.subscription.unsubscribe();
  }

  fn is_closed(&self) -> bool {
    self.observer.is_none() || self.subscription.is_closed()
  }
}

/// Closure bundle observer used by the `subscribe*` methods.
pub(crate) struct FnAllObserver<N, E, C> {
  pub(crate) next_fn: N,
  pub(crate) error_fn: E,
  pub(crate) complete_fn: C,
}

impl<N, E, C, Item, Err> Observer<Item, Err> for FnAllObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next_fn)(value) }

  #[inline]
  fn error(&mut self, err: Err) { (self.error_fn)(err) }

  #[inline]
  fn complete(&mut self) { (self.complete_fn)() }
}

/// A disposable cell holding one boxed observer.
///
/// Delivery takes the observer out of the cell, invokes it with no lock
/// held, and puts it back only while the slot is still wanted. Disposing
/// the slot concurrently with an in-flight delivery is safe; at most that
/// one delivery may still land.
pub(crate) struct ObserverSlot<Item, Err> {
  disposed: AtomicBool,
  cell: Mutex<Option<BoxObserver<Item, Err>>>,
}

impl<Item, Err> ObserverSlot<Item, Err> {
  pub(crate) fn new(observer: BoxObserver<Item, Err>) -> Self {
    ObserverSlot { disposed: AtomicBool::new(false), cell: Mutex::new(Some(observer)) }
  }

  pub(crate) fn next(&self, value: Item) {
    if self.disposed.load(Ordering::Relaxed) {
      return;
    }
    let taken = self.cell.lock().take();
    let Some(mut observer) = taken else { return };
    observer.next(value);
    if !self.disposed.load(Ordering::Relaxed) && !observer.is_closed() {
      *self.cell.lock() = Some(observer);
    }
  }

  pub(crate) fn error(&self, err: Err) {
    let taken = self.cell.lock().take();
    if let Some(mut observer) = taken {
      observer.error(err);
    }
  }

  pub(crate) fn complete(&self) {
    let taken = self.cell.lock().take();
    if let Some(mut observer) = taken {
      observer.complete();
    }
  }

  /// Emit the final value and completion in one step, as `AsyncSubject`
  /// releases its buffered value.
  pub(crate) fn finish_with(&self, value: Item) {
    let taken = self.cell.lock().take();
    if let Some(mut observer) = taken {
      observer.next(value);
      observer.complete();
    }
  }

  pub(crate) fn dispose(&self) {
    self.disposed.store(true, Ordering::Relaxed);
    self.cell.lock().take();
  }

  pub(crate) fn is_live(&self) -> bool {
    !self.disposed.load(Ordering::Relaxed)
      && self.cell.lock().as_ref().is_some_and(|o| !o.is_closed())
  }
}
