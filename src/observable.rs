//! The Observable trait: subscribe surface and operator composition.

use std::convert::Infallible;

use crate::{
  observer::Observer,
  ops::{
    catch_error::CatchErrorOp,
    combine_latest::CombineLatestOp,
    distinct::{DistinctOp, DistinctUntilChangedOp},
    filter::FilterOp,
    into_stream::ObservableStream,
    map::MapOp,
    merge::MergeOp,
    retry::RetryOp,
    scan::ScanOp,
    skip::{SkipOp, SkipWhileOp},
    start_with::StartWithOp,
    take::{TakeOp, TakeWhileOp},
  },
  subscriber::{FnAllObserver, Subscriber},
  subscription::Subscription,
};

mod create;
mod from_event;
mod from_iter;
mod generate;
mod interval;
mod of;
mod timer;

pub use create::{create, CreateObservable, Emitter};
pub use from_event::{from_event, EventSource, FromEventObservable};
pub use from_iter::{from_iter, range, FromIterObservable};
pub use generate::{generate, GenerateObservable};
pub use interval::{interval, IntervalObservable};
pub use of::{
  empty, never, of, throw, EmptyObservable, NeverObservable, OfObservable, ThrowObservable,
};
pub use timer::{timer, timer_periodic, TimerObservable};

/// A source of a potentially unbounded sequence of notifications.
///
/// Subscribing consumes the observable value; cloneable sources (subjects
/// and most factories) can be subscribed repeatedly by cloning first.
pub trait Observable: Sized {
  type Item;
  type Err;

  /// Register `observer` with this source and start emitting.
  ///
  /// This is the primitive every source implements. Callers normally go
  /// through one of the `subscribe*` methods instead, which wrap the
  /// observer in the terminal contract guard.
  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static;

  // ---------------------------------------------------------------------
  // Subscribe surface
  // ---------------------------------------------------------------------

  /// Subscribe with a value handler only.
  ///
  /// Only available when `Err = Infallible`: subscribing to a stream that
  /// can fail without installing an error handler is rejected at compile
  /// time. Use [`subscribe_err`](Observable::subscribe_err) for fallible
  /// streams.
  fn subscribe<N>(self, next: N) -> Subscription
  where
    Self: Observable<Err = Infallible>,
    N: FnMut(Self::Item) + Send + 'static,
  {
    self.subscribe_all(next, |err: Infallible| match err {}, || {})
  }

  /// Subscribe with value and error handlers.
  fn subscribe_err<N, E>(self, next: N, error: E) -> Subscription
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(Self::Err) + Send + 'static,
  {
    self.subscribe_all(next, error, || {})
  }

  /// Subscribe with value, error, and completion handlers.
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(Self::Err) + Send + 'static,
    C: FnMut() + Send + 'static,
  {
    self.subscribe_with(FnAllObserver { next_fn: next, error_fn: error, complete_fn: complete })
  }

  /// Subscribe with a custom [`Observer`] implementation.
  fn subscribe_with<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static,
  {
    let handle = Subscription::new();
    let upstream = self.actual_subscribe(Subscriber::new(observer, handle.clone()));
    handle.add(upstream);
    handle
  }

  // ---------------------------------------------------------------------
  // Operators
  // ---------------------------------------------------------------------

  /// Call a closure on each value and emit its return instead.
  fn map<B, F>(self, f: F) -> MapOp<Self, F, B>
  where
    F: FnMut(Self::Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Emit only the values the predicate accepts.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    FilterOp::new(self, predicate)
  }

  /// Suppress values that have been emitted before.
  fn distinct(self) -> DistinctOp<Self> { DistinctOp::new(self) }

  /// Suppress values equal to the immediately preceding emission. The
  /// first value always passes.
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self> {
    DistinctUntilChangedOp::new(self)
  }

  /// Drop the first `count` values, then forward the rest.
  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp::new(self, count) }

  /// Drop values while the predicate holds, then forward everything.
  fn skip_while<F>(self, predicate: F) -> SkipWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    SkipWhileOp::new(self, predicate)
  }

  /// Forward only the first `count` values, then complete and release the
  /// upstream subscription.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Forward values while the predicate holds, then complete and release
  /// the upstream subscription.
  fn take_while<F>(self, predicate: F) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool,
  {
    TakeWhileOp::new(self, predicate)
  }

  /// Emit the running fold of every value into an accumulator. The seed
  /// itself is never emitted.
  fn scan<B, F>(self, seed: B, f: F) -> ScanOp<Self, F, B>
  where
    F: FnMut(B, Self::Item) -> B,
  {
    ScanOp::new(self, seed, f)
  }

  /// Emit the given values before anything the source emits.
  fn start_with(self, values: Vec<Self::Item>) -> StartWithOp<Self> {
    StartWithOp::new(self, values)
  }

  /// Interleave two sources in arrival order. Completes when both have
  /// completed; an error from either terminates the merged stream.
  fn merge<S>(self, other: S) -> MergeOp<Self, S>
  where
    S: Observable<Item = Self::Item, Err = Self::Err>,
  {
    MergeOp::new(self, other)
  }

  /// Combine the latest value of two sources through a closure, emitting
  /// once both have produced at least one value and on every update after.
  fn combine_latest<S, F, B>(self, other: S, combiner: F) -> CombineLatestOp<Self, S, F, B>
  where
    S: Observable<Err = Self::Err>,
    F: FnMut(Self::Item, S::Item) -> B,
  {
    CombineLatestOp::new(self, other, combiner)
  }

  /// On upstream error, release the upstream subscription and continue
  /// with the observable the handler returns.
  fn catch_error<C, F>(self, handler: F) -> CatchErrorOp<Self, F, C>
  where
    C: Observable<Item = Self::Item>,
    F: FnOnce(Self::Err) -> C,
  {
    CatchErrorOp::new(self, handler)
  }

  /// On upstream error, resubscribe to a fresh copy of the source up to
  /// `max_attempts` times before forwarding the final error.
  fn retry(self, max_attempts: usize) -> RetryOp<Self>
  where
    Self: Clone,
  {
    RetryOp::new(self, max_attempts)
  }

  /// Bridge this observable into a [`futures::Stream`] of
  /// `Result<Item, Err>`. Dropping the stream unsubscribes.
  ///
  /// [`futures::Stream`]: futures::Stream
  fn into_stream(self) -> ObservableStream<Self::Item, Self::Err>
  where
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    ObservableStream::new(self)
  }
}
