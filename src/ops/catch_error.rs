use std::marker::PhantomData;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Continues with a fallback observable when the source errors.
///
/// On upstream error the upstream subscription is released, the handler
/// maps the error to a fallback observable, and the downstream observer is
/// moved onto the fallback. Values and completion pass through untouched.
pub struct CatchErrorOp<S, F, C> {
  source: S,
  handler: F,
  _marker: PhantomData<fn() -> C>,
}

impl<S, F, C> CatchErrorOp<S, F, C> {
  pub(crate) fn new(source: S, handler: F) -> Self {
    CatchErrorOp { source, handler, _marker: PhantomData }
  }
}

impl<S: Clone, F: Clone, C> Clone for CatchErrorOp<S, F, C> {
  fn clone(&self) -> Self {
    CatchErrorOp {
      source: self.source.clone(),
      handler: self.handler.clone(),
      _marker: PhantomData,
    }
  }
}

impl<S, F, C> Observable for CatchErrorOp<S, F, C>
where
  S: Observable,
  C: Observable<Item = S::Item> + 'static,
  F: FnOnce(S::Err) -> C + Send + 'static,
{
  type Item = S::Item;
  type Err = C::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, C::Err> + Send + 'static,
  {
    let handle = Subscription::new();
    let upstream = Subscription::new();
    let catch = CatchErrorObserver {
      observer: Some(observer),
      handler: Some(self.handler),
      handle: handle.clone(),
      upstream: upstream.clone(),
      _marker: PhantomData::<fn() -> C>,
    };
    upstream.add(self.source.actual_subscribe(catch));
    handle.add(upstream);
    handle
  }
}

pub struct CatchErrorObserver<O, F, C> {
  observer: Option<O>,
  handler: Option<F>,
  handle: Subscription,
  upstream: Subscription,
  _marker: PhantomData<fn() -> C>,
}

impl<O, F, C, Item, SErr> Observer<Item, SErr> for CatchErrorObserver<O, F, C>
where
  C: Observable<Item = Item>,
  O: Observer<Item, C::Err> + Send + 'static,
  F: FnOnce(SErr) -> C,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.observer {
      observer.next(value);
    }
  }

  fn error(&mut self, err: SErr) {
    self.upstream.unsubscribe();
    if let (Some(observer), Some(handler)) = (self.observer.take(), self.handler.take()) {
      let fallback = handler(err);
      self.handle.add(fallback.actual_subscribe(observer));
    }
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.observer.take() {
      observer.complete();
    }
    self.handle.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.observer.is_none() }
}
