//! Subscription: the disposable handle returned by every subscribe call.
//!
//! A `Subscription` owns the teardown work of one observer's registration:
//! detaching from a subject, stopping a ticker thread, releasing whatever a
//! `create` producer acquired. Handles are cheaply cloneable; clones share
//! the same disposal state, so unsubscribing through any clone detaches the
//! observer everywhere.

use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

/// Anything that can be cancelled and queried for liveness.
pub trait SubscriptionLike {
  /// Detach the observer this handle stands for. Idempotent: the second
  /// and later calls are no-ops.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

/// Work owed at disposal time.
///
/// Producers given to [`create`](crate::observable::create) return one of
/// these to describe how their resources are released.
pub enum TearDown {
  /// Nothing to release.
  None,
  /// A cleanup action run exactly once at disposal.
  Action(Box<dyn FnOnce() + Send>),
  /// Another subscription cancelled at disposal.
  Other(Subscription),
}

impl TearDown {
  /// Wrap a cleanup closure.
  pub fn action<F>(f: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    TearDown::Action(Box::new(f))
  }

  pub(crate) fn run(self) {
    match self {
      TearDown::None => {}
      TearDown::Action(action) => action(),
      TearDown::Other(nested) => nested.unsubscribe(),
    }
  }

  fn is_closed(&self) -> bool {
    match self {
      TearDown::None => true,
      TearDown::Action(_) => false,
      TearDown::Other(nested) => nested.is_closed(),
    }
  }
}

struct Inner {
  closed: bool,
  teardowns: SmallVec<[TearDown; 1]>,
}

/// A shared, idempotently disposable handle.
#[derive(Clone)]
pub struct Subscription {
  inner: Arc<Mutex<Inner>>,
}

impl Default for Subscription {
  fn default() -> Self { Self::new() }
}

impl Subscription {
  /// A live handle with no teardown work yet.
  pub fn new() -> Self {
    Subscription {
      inner: Arc::new(Mutex::new(Inner { closed: false, teardowns: SmallVec::new() })),
    }
  }

  /// A handle that is already disposed, as returned by sources that finish
  /// synchronously during subscribe.
  pub fn closed() -> Self {
    Subscription {
      inner: Arc::new(Mutex::new(Inner { closed: true, teardowns: SmallVec::new() })),
    }
  }

  /// Tie `other`'s disposal to this handle. If this handle is already
  /// closed, `other` is unsubscribed immediately.
  pub fn add(&self, other: Subscription) {
    if Arc::ptr_eq(&self.inner, &other.inner) {
      return;
    }
    self.add_teardown(TearDown::Other(other));
  }

  /// Register a cleanup action to run exactly once at disposal. If this
  /// handle is already closed, the action runs immediately.
  pub fn add_action<F>(&self, action: F)
  where
    F: FnOnce() + Send + 'static,
  {
    self.add_teardown(TearDown::action(action));
  }

  /// Register teardown work to run at disposal. If this handle is already
  /// closed, the work runs immediately.
  pub fn add_teardown(&self, teardown: TearDown) {
    let pending = {
      let mut inner = self.inner.lock();
      if inner.closed {
        Some(teardown)
      } else {
        inner.teardowns.retain(|t| !t.is_closed());
        inner.teardowns.push(teardown);
        None
      }
    };
    if let Some(teardown) = pending {
      teardown.run();
    }
  }

  pub fn unsubscribe(&self) {
    let teardowns = {
      let mut inner = self.inner.lock();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardowns)
    };
    // Teardowns run outside the lock so that one of them may touch this
    // handle again without deadlocking.
    for teardown in teardowns {
      teardown.run();
    }
  }

  pub fn is_closed(&self) -> bool { self.inner.lock().closed }

  /// Wrap this handle so it unsubscribes when dropped.
  pub fn guard(self) -> SubscriptionGuard<Subscription> { SubscriptionGuard(self) }
}

impl SubscriptionLike for Subscription {
  #[inline]
  fn unsubscribe(&mut self) { Subscription::unsubscribe(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscription::is_closed(self) }
}

/// Scoped ownership of a subscription: unsubscribes on drop.
///
/// Subscriptions are never released by garbage-collection-style
/// finalization; this guard is the way to bind one to a lexical scope.
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub T);

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use super::*;

  #[test]
  fn unsubscribe_runs_teardown_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let c_runs = runs.clone();
    let sub = Subscription::new();
    sub.add_action(move || {
      c_runs.fetch_add(1, Ordering::Relaxed);
    });

    sub.unsubscribe();
    sub.unsubscribe();
    assert_eq!(runs.load(Ordering::Relaxed), 1);
    assert!(sub.is_closed());
  }

  #[test]
  fn add_to_closed_handle_runs_immediately() {
    let runs = Arc::new(AtomicUsize::new(0));
    let c_runs = runs.clone();
    let sub = Subscription::new();
    sub.unsubscribe();
    sub.add_action(move || {
      c_runs.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(runs.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn nested_subscription_is_cancelled() {
    let outer = Subscription::new();
    let inner = Subscription::new();
    outer.add(inner.clone());
    assert!(!inner.is_closed());
    outer.unsubscribe();
    assert!(inner.is_closed());
  }

  #[test]
  fn adding_self_does_not_cycle() {
    let sub = Subscription::new();
    sub.add(sub.clone());
    sub.unsubscribe();
    assert!(sub.is_closed());
  }

  #[test]
  fn clones_share_disposal_state() {
    let sub = Subscription::new();
    let twin = sub.clone();
    twin.unsubscribe();
    assert!(sub.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let runs = Arc::new(AtomicUsize::new(0));
    let c_runs = runs.clone();
    let sub = Subscription::new();
    sub.add_action(move || {
      c_runs.fetch_add(1, Ordering::Relaxed);
    });
    {
      let _guard = sub.clone().guard();
    }
    assert_eq!(runs.load(Ordering::Relaxed), 1);
    assert!(sub.is_closed());
  }
}
