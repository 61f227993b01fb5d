//! Subjects: hot multicast relays that are observer and observable at once.
//!
//! All four variants share one core: a registry of observer slots, a
//! terminal state machine, and an optional value cache that decides what a
//! late subscriber sees. Broadcast is a synchronous in-order loop over a
//! snapshot of the registry, serialized by an emission lock so that every
//! observer sees push k before any observer sees push k+1.
//!
//! State machine: `Active` until the first `error`/`complete`, then
//! terminal forever. Pushes into a terminal subject are silently dropped
//! (visible at trace level), and a subscriber arriving after termination
//! immediately receives the stored terminal notification, preceded by
//! whatever history the variant replays.
//!
//! Emitting into a subject from inside one of its own observer callbacks
//! is not supported; use an explicit boundary (a channel, a queue) for
//! feedback loops.

use std::{
  collections::VecDeque,
  sync::Arc,
  time::{Duration, Instant},
};

use parking_lot::Mutex;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
  observable::Observable,
  observer::{BoxObserver, Observer},
  subscriber::ObserverSlot,
  subscription::Subscription,
};

/// What a variant remembers about past pushes, and therefore what a new
/// subscriber is shown before live values.
pub(crate) enum Cache<Item> {
  /// Remember nothing (plain `Subject`).
  None,
  /// Always hold the current value (`BehaviorSubject`).
  Behavior(Item),
  /// Hold a bounded history (`ReplaySubject`).
  Replay {
    buffer: VecDeque<(Instant, Item)>,
    policy: ReplayPolicy,
  },
  /// Hold only the last value, released at completion (`AsyncSubject`).
  Last(Option<Item>),
}

#[derive(Clone, Copy)]
pub(crate) enum ReplayPolicy {
  Count(usize),
  Window(Duration),
}

impl ReplayPolicy {
  fn evict<Item>(&self, buffer: &mut VecDeque<(Instant, Item)>, now: Instant) {
    match self {
      ReplayPolicy::Count(limit) => {
        while buffer.len() > *limit {
          buffer.pop_front();
        }
      }
      ReplayPolicy::Window(window) => {
        while buffer
          .front()
          .is_some_and(|(stamp, _)| now.duration_since(*stamp) > *window)
        {
          buffer.pop_front();
        }
      }
    }
  }
}

impl<Item: Clone> Cache<Item> {
  /// Record a push. Returns whether the push is broadcast to current
  /// observers.
  fn record(&mut self, value: &Item) -> bool {
    match self {
      Cache::None => true,
      Cache::Behavior(current) => {
        *current = value.clone();
        true
      }
      Cache::Replay { buffer, policy } => {
        let now = Instant::now();
        buffer.push_back((now, value.clone()));
        policy.evict(buffer, now);
        true
      }
      // Invisible until completion releases it.
      Cache::Last(stored) => {
        *stored = Some(value.clone());
        false
      }
    }
  }

  /// The history a subscriber is shown before live values (or before the
  /// terminal notification, once terminated).
  fn replay_values(&mut self, terminated: bool) -> SmallVec<[Item; 4]> {
    match self {
      Cache::None => SmallVec::new(),
      Cache::Behavior(current) => {
        if terminated {
          SmallVec::new()
        } else {
          let mut values = SmallVec::new();
          values.push(current.clone());
          values
        }
      }
      Cache::Replay { buffer, policy } => {
        policy.evict(buffer, Instant::now());
        buffer.iter().map(|(_, v)| v.clone()).collect()
      }
      Cache::Last(stored) => {
        if terminated {
          stored.iter().cloned().collect()
        } else {
          SmallVec::new()
        }
      }
    }
  }
}

enum TerminalState<Err> {
  Active,
  Completed,
  Failed(Err),
}

struct Registry<Item, Err> {
  slots: SmallVec<[(u64, Arc<ObserverSlot<Item, Err>>); 2]>,
  next_id: u64,
  state: TerminalState<Err>,
  cache: Cache<Item>,
}

struct CoreInner<Item, Err> {
  /// Serializes broadcasts: held for the whole fan-out of one push so
  /// observers never see two pushes interleaved.
  emit: Mutex<()>,
  registry: Mutex<Registry<Item, Err>>,
}

/// The multicast machinery shared by every subject variant.
pub(crate) struct SubjectCore<Item, Err> {
  inner: Arc<CoreInner<Item, Err>>,
}

impl<Item, Err> Clone for SubjectCore<Item, Err> {
  fn clone(&self) -> Self { SubjectCore { inner: self.inner.clone() } }
}

impl<Item, Err> SubjectCore<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub(crate) fn new(cache: Cache<Item>) -> Self {
    SubjectCore {
      inner: Arc::new(CoreInner {
        emit: Mutex::new(()),
        registry: Mutex::new(Registry {
          slots: SmallVec::new(),
          next_id: 0,
          state: TerminalState::Active,
          cache,
        }),
      }),
    }
  }

  pub(crate) fn push(&self, value: Item) {
    let _emit = self.inner.emit.lock();
    let snapshot: SmallVec<[Arc<ObserverSlot<Item, Err>>; 4]> = {
      let mut registry = self.inner.registry.lock();
      let registry = &mut *registry;
      if !matches!(registry.state, TerminalState::Active) {
        trace!("value dropped after terminal notification");
        return;
      }
      if !registry.cache.record(&value) {
        return;
      }
      registry.slots.iter().map(|(_, slot)| slot.clone()).collect()
    };
    for slot in snapshot {
      slot.next(value.clone());
    }
  }

  pub(crate) fn finish(&self) {
    let _emit = self.inner.emit.lock();
    let (slots, last) = {
      let mut registry = self.inner.registry.lock();
      if !matches!(registry.state, TerminalState::Active) {
        trace!("completion dropped after terminal notification");
        return;
      }
      registry.state = TerminalState::Completed;
      let last = match &registry.cache {
        Cache::Last(stored) => stored.clone(),
        _ => None,
      };
      (std::mem::take(&mut registry.slots), last)
    };
    for (_, slot) in slots {
      match &last {
        Some(value) => slot.finish_with(value.clone()),
        None => slot.complete(),
      }
    }
  }

  pub(crate) fn fail(&self, err: Err) {
    let _emit = self.inner.emit.lock();
    let slots = {
      let mut registry = self.inner.registry.lock();
      if !matches!(registry.state, TerminalState::Active) {
        trace!("error dropped after terminal notification");
        return;
      }
      registry.state = TerminalState::Failed(err.clone());
      std::mem::take(&mut registry.slots)
    };
    for (_, slot) in slots {
      slot.error(err.clone());
    }
  }

  pub(crate) fn subscribe(&self, observer: BoxObserver<Item, Err>) -> Subscription {
    let _emit = self.inner.emit.lock();
    let mut observer = observer;

    enum Arrival<Item, Err> {
      Live(SmallVec<[Item; 4]>),
      Terminal(SmallVec<[Item; 4]>, Option<Err>),
    }

    let arrival = {
      let mut registry = self.inner.registry.lock();
      let registry = &mut *registry;
      match &registry.state {
        TerminalState::Active => Arrival::Live(registry.cache.replay_values(false)),
        TerminalState::Completed => Arrival::Terminal(registry.cache.replay_values(true), None),
        TerminalState::Failed(err) => Arrival::Terminal(SmallVec::new(), Some(err.clone())),
      }
    };

    match arrival {
      Arrival::Live(replay) => {
        for value in replay {
          if observer.is_closed() {
            return Subscription::closed();
          }
          observer.next(value);
        }
        if observer.is_closed() {
          return Subscription::closed();
        }
        let slot = Arc::new(ObserverSlot::new(observer));
        let id = {
          let mut registry = self.inner.registry.lock();
          let id = registry.next_id;
          registry.next_id += 1;
          registry.slots.push((id, slot.clone()));
          id
        };
        let core = self.clone();
        let subscription = Subscription::new();
        subscription.add_action(move || {
          slot.dispose();
          core.remove(id);
        });
        subscription
      }
      Arrival::Terminal(replay, err) => {
        for value in replay {
          observer.next(value);
        }
        match err {
          Some(err) => observer.error(err),
          None => observer.complete(),
        }
        Subscription::closed()
      }
    }
  }

  fn remove(&self, id: u64) {
    let mut registry = self.inner.registry.lock();
    registry.slots.retain(|(slot_id, _)| *slot_id != id);
  }

  pub(crate) fn observer_count(&self) -> usize { self.inner.registry.lock().slots.len() }

  pub(crate) fn is_terminated(&self) -> bool {
    !matches!(self.inner.registry.lock().state, TerminalState::Active)
  }

  pub(crate) fn current_value(&self) -> Option<Item> {
    match &self.inner.registry.lock().cache {
      Cache::Behavior(value) => Some(value.clone()),
      _ => None,
    }
  }
}

/// Generates the shared public surface of a subject variant: the `&self`
/// push API for producers, the `Observer` impl for use as a downstream
/// sink, and the `Observable` impl for subscribing.
macro_rules! impl_subject_api {
  ($subject:ident) => {
    impl<Item, Err> Clone for $subject<Item, Err> {
      fn clone(&self) -> Self { Self { core: self.core.clone() } }
    }

    impl<Item, Err> $subject<Item, Err>
    where
      Item: Clone + Send + 'static,
      Err: Clone + Send + 'static,
    {
      /// Push the next value to every current observer.
      pub fn next(&self, value: Item) { self.core.push(value) }

      /// Terminate the stream with an error.
      pub fn error(&self, err: Err) { self.core.fail(err) }

      /// Terminate the stream successfully.
      pub fn complete(&self) { self.core.finish() }

      /// Number of currently registered observers.
      pub fn observer_count(&self) -> usize { self.core.observer_count() }

      /// Whether a terminal notification has been delivered.
      pub fn is_terminated(&self) -> bool { self.core.is_terminated() }
    }

    impl<Item, Err> Observer<Item, Err> for $subject<Item, Err>
    where
      Item: Clone + Send + 'static,
      Err: Clone + Send + 'static,
    {
      fn next(&mut self, value: Item) { self.core.push(value) }

      fn error(&mut self, err: Err) { self.core.fail(err) }

      fn complete(&mut self) { self.core.finish() }

      fn is_closed(&self) -> bool { self.core.is_terminated() }
    }

    impl<Item, Err> Observable for $subject<Item, Err>
    where
      Item: Clone + Send + 'static,
      Err: Clone + Send + 'static,
    {
      type Item = Item;
      type Err = Err;

      fn actual_subscribe<O>(self, observer: O) -> Subscription
      where
        O: Observer<Item, Err> + Send + 'static,
      {
        self.core.subscribe(Box::new(observer))
      }
    }
  };
}

pub(crate) use impl_subject_api;

mod async_subject;
mod behavior_subject;
mod replay_subject;

pub use async_subject::AsyncSubject;
pub use behavior_subject::BehaviorSubject;
pub use replay_subject::ReplaySubject;

/// A hot multicast relay with no memory: observers see exactly the pushes
/// made while they are subscribed.
pub struct Subject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new() -> Self { Subject { core: SubjectCore::new(Cache::None) } }
}

impl<Item, Err> Default for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn default() -> Self { Self::new() }
}

impl_subject_api!(Subject);
