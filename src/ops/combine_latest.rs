use std::{marker::PhantomData, sync::Arc};

use parking_lot::Mutex;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Combines the latest values of two sources through a closure.
///
/// Emits nothing until both sources have produced at least one value;
/// after that, every update from either side emits the combination with
/// the other side's latest value. Completes once both sources have
/// completed; an error from either side propagates immediately.
pub struct CombineLatestOp<A, B, F, Out> {
  left: A,
  right: B,
  combiner: F,
  _marker: PhantomData<fn() -> Out>,
}

impl<A, B, F, Out> CombineLatestOp<A, B, F, Out> {
  pub(crate) fn new(left: A, right: B, combiner: F) -> Self {
    CombineLatestOp { left, right, combiner, _marker: PhantomData }
  }
}

impl<A: Clone, B: Clone, F: Clone, Out> Clone for CombineLatestOp<A, B, F, Out> {
  fn clone(&self) -> Self {
    CombineLatestOp {
      left: self.left.clone(),
      right: self.right.clone(),
      combiner: self.combiner.clone(),
      _marker: PhantomData,
    }
  }
}

impl<A, B, F, Out> Observable for CombineLatestOp<A, B, F, Out>
where
  A: Observable,
  B: Observable<Err = A::Err>,
  A::Item: Clone + Send + 'static,
  B::Item: Clone + Send + 'static,
  F: FnMut(A::Item, B::Item) -> Out + Send + 'static,
{
  type Item = Out;
  type Err = A::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Out, A::Err> + Send + 'static,
  {
    let handle = Subscription::new();
    let state = Arc::new(Mutex::new(CombineState {
      observer: Some(observer),
      combiner: self.combiner,
      left: None,
      right: None,
      live: 2,
    }));

    let left = self
      .left
      .actual_subscribe(CombineLeftObserver { state: state.clone(), handle: handle.clone() });
    handle.add(left);

    if !handle.is_closed() {
      let right = self
        .right
        .actual_subscribe(CombineRightObserver { state, handle: handle.clone() });
      handle.add(right);
    }
    handle
  }
}

struct CombineState<O, F, L, R> {
  observer: Option<O>,
  combiner: F,
  left: Option<L>,
  right: Option<R>,
  live: usize,
}

impl<O, F, L, R> CombineState<O, F, L, R>
where
  L: Clone,
  R: Clone,
{
  fn emit_if_ready<Out, Err>(&mut self)
  where
    O: Observer<Out, Err>,
    F: FnMut(L, R) -> Out,
  {
    let (Some(left), Some(right)) = (self.left.clone(), self.right.clone()) else { return };
    let combined = (self.combiner)(left, right);
    if let Some(observer) = &mut self.observer {
      observer.next(combined);
    }
  }

  fn take_on_error(&mut self) -> Option<O> { self.observer.take() }

  fn take_on_complete(&mut self) -> Option<O> {
    self.live -= 1;
    if self.live == 0 { self.observer.take() } else { None }
  }
}

pub struct CombineLeftObserver<O, F, L, R> {
  state: Arc<Mutex<CombineState<O, F, L, R>>>,
  handle: Subscription,
}

pub struct CombineRightObserver<O, F, L, R> {
  state: Arc<Mutex<CombineState<O, F, L, R>>>,
  handle: Subscription,
}

macro_rules! impl_combine_side {
  ($side:ident, $item:ident, $slot:ident) => {
    impl<O, F, L, R, Out, Err> Observer<$item, Err> for $side<O, F, L, R>
    where
      O: Observer<Out, Err>,
      F: FnMut(L, R) -> Out,
      L: Clone,
      R: Clone,
    {
      fn next(&mut self, value: $item) {
        let mut state = self.state.lock();
        state.$slot = Some(value);
        state.emit_if_ready::<Out, Err>();
      }

      fn error(&mut self, err: Err) {
        let taken = self.state.lock().take_on_error();
        if let Some(mut observer) = taken {
          observer.error(err);
        }
        self.handle.unsubscribe();
      }

      fn complete(&mut self) {
        let finished = self.state.lock().take_on_complete();
        if let Some(mut observer) = finished {
          observer.complete();
          self.handle.unsubscribe();
        }
      }

      fn is_closed(&self) -> bool { self.state.lock().observer.is_none() }
    }
  };
}

impl_combine_side!(CombineLeftObserver, L, left);
impl_combine_side!(CombineRightObserver, R, right);
