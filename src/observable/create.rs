use std::{marker::PhantomData, sync::Arc};

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::ObserverSlot,
  subscription::{Subscription, TearDown},
};

/// Creates an observable from a producer routine.
///
/// The producer runs once per subscription. It receives an [`Emitter`]
/// bound to the incoming observer and returns a [`TearDown`] describing
/// how its resources are released; the engine runs that teardown exactly
/// once when the subscription is disposed, whether or not the producer is
/// still running. Anything the producer acquires for the lifetime of the
/// subscription (a timer, a handle, a thread) belongs in the teardown.
///
/// The emitter is cloneable and `Send`, so a producer may hand it to
/// another thread and emit from there.
///
/// # Examples
///
/// ```
/// use ripple::prelude::*;
///
/// observable::create(|emitter: Emitter<i32, std::convert::Infallible>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
///   TearDown::None
/// })
/// .subscribe(|v| println!("{}", v));
/// ```
pub fn create<F, Item, Err>(producer: F) -> CreateObservable<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> TearDown,
{
  CreateObservable { producer, _marker: PhantomData }
}

#[derive(Clone)]
pub struct CreateObservable<F, Item, Err> {
  producer: F,
  _marker: PhantomData<(Item, Err)>,
}

/// Push handle given to a `create` producer.
///
/// A terminal push makes the emitter inert, and pushes after the
/// subscription is disposed are dropped, so a producer may keep emitting
/// unconditionally; checking [`is_closed`](Emitter::is_closed) is only
/// needed to stop doing work nobody will see.
pub struct Emitter<Item, Err> {
  slot: Arc<ObserverSlot<Item, Err>>,
}

impl<Item, Err> Clone for Emitter<Item, Err> {
  fn clone(&self) -> Self { Emitter { slot: self.slot.clone() } }
}

impl<Item, Err> Emitter<Item, Err> {
  pub fn next(&self, value: Item) { self.slot.next(value) }

  pub fn error(&self, err: Err) { self.slot.error(err) }

  pub fn complete(&self) { self.slot.complete() }

  /// Whether the observer is gone: disposed, terminated, or no longer
  /// accepting values.
  pub fn is_closed(&self) -> bool { !self.slot.is_live() }
}

impl<F, Item, Err> Observable for CreateObservable<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> TearDown,
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let slot = Arc::new(ObserverSlot::new(Box::new(observer)));
    let cleanup = (self.producer)(Emitter { slot: slot.clone() });
    let handle = Subscription::new();
    handle.add_action(move || {
      slot.dispose();
      cleanup.run();
    });
    handle
  }
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::{error::StreamError, prelude::*};

  #[test]
  fn next_then_complete() {
    let emitted = Arc::new(Mutex::new(vec![]));
    let c_emitted = emitted.clone();

    observable::create(|emitter: Emitter<i32, std::convert::Infallible>| {
      emitter.next(1);
      emitter.next(2);
      emitter.complete();
      // Dropped after the terminal notification.
      emitter.next(3);
      TearDown::None
    })
    .subscribe(move |v| c_emitted.lock().unwrap().push(v));

    assert_eq!(*emitted.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn error_reaches_the_error_handler() {
    let errors = Arc::new(Mutex::new(vec![]));
    let c_errors = errors.clone();

    observable::create(|emitter: Emitter<i32, StreamError>| {
      emitter.error(StreamError::Producer("broken".into()));
      TearDown::None
    })
    .subscribe_err(|_| {}, move |e| c_errors.lock().unwrap().push(e));

    assert_eq!(
      *errors.lock().unwrap(),
      vec![StreamError::Producer("broken".into())]
    );
  }

  #[test]
  fn teardown_runs_once_on_unsubscribe() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let c_cleanups = cleanups.clone();

    let subscription = observable::create(move |emitter: Emitter<i32, std::convert::Infallible>| {
      emitter.next(1);
      let cleanups = c_cleanups.clone();
      TearDown::action(move || {
        cleanups.fetch_add(1, Ordering::Relaxed);
      })
    })
    .subscribe(|_| {});

    assert_eq!(cleanups.load(Ordering::Relaxed), 0);
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(cleanups.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn teardown_runs_when_the_stream_completes() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let c_cleanups = cleanups.clone();

    observable::create(move |emitter: Emitter<i32, std::convert::Infallible>| {
      emitter.next(1);
      emitter.complete();
      let cleanups = c_cleanups.clone();
      TearDown::action(move || {
        cleanups.fetch_add(1, Ordering::Relaxed);
      })
    })
    .subscribe(|_| {});

    // Completion disposes the subscribe handle, which releases the
    // producer's teardown.
    assert_eq!(cleanups.load(Ordering::Relaxed), 1);
  }
}
