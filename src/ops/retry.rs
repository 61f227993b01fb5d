use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Resubscribes to a fresh copy of the source when it errors.
///
/// Up to `max_attempts` resubscriptions are made before the final error is
/// forwarded downstream. The source must be `Clone`: every attempt runs a
/// fresh instance, so a producer with per-subscription state starts over.
#[derive(Clone)]
pub struct RetryOp<S> {
  source: S,
  max_attempts: usize,
}

impl<S> RetryOp<S> {
  pub(crate) fn new(source: S, max_attempts: usize) -> Self { RetryOp { source, max_attempts } }
}

impl<S> Observable for RetryOp<S>
where
  S: Observable + Clone + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let handle = Subscription::new();
    let upstream = Subscription::new();
    let state = Arc::new(Mutex::new(RetryState {
      source: self.source.clone(),
      remaining: self.max_attempts,
      observer: Some(observer),
      upstream: upstream.clone(),
    }));

    let attempt = self
      .source
      .actual_subscribe(RetryObserver { state, handle: handle.clone() });
    upstream.add(attempt);
    handle.add(upstream);
    handle
  }
}

struct RetryState<S, O> {
  source: S,
  remaining: usize,
  observer: Option<O>,
  upstream: Subscription,
}

enum Decision<S, O> {
  GiveUp(O),
  Again { source: S, old: Subscription, fresh: Subscription },
}

pub struct RetryObserver<S, O> {
  state: Arc<Mutex<RetryState<S, O>>>,
  handle: Subscription,
}

impl<S, O, Item, Err> Observer<Item, Err> for RetryObserver<S, O>
where
  S: Observable<Item = Item, Err = Err> + Clone + Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.lock();
    if let Some(observer) = &mut state.observer {
      observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    let decision = {
      let mut state = self.state.lock();
      if state.observer.is_none() {
        None
      } else if state.remaining == 0 {
        state.observer.take().map(Decision::GiveUp)
      } else {
        state.remaining -= 1;
        let source = state.source.clone();
        let old = std::mem::replace(&mut state.upstream, Subscription::new());
        let fresh = state.upstream.clone();
        Some(Decision::Again { source, old, fresh })
      }
    };
    match decision {
      Some(Decision::GiveUp(mut observer)) => {
        observer.error(err);
        self.handle.unsubscribe();
      }
      Some(Decision::Again { source, old, fresh }) => {
        old.unsubscribe();
        debug!("source errored, resubscribing");
        let attempt = source.actual_subscribe(RetryObserver {
          state: self.state.clone(),
          handle: self.handle.clone(),
        });
        fresh.add(attempt);
        self.handle.add(fresh);
      }
      None => {}
    }
  }

  fn complete(&mut self) {
    let finished = self.state.lock().observer.take();
    if let Some(mut observer) = finished {
      observer.complete();
    }
    self.handle.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.state.lock().observer.is_none() }
}
