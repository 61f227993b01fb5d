use super::{impl_subject_api, Cache, SubjectCore};
use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// A subject that always holds a current value.
///
/// Every new subscriber immediately receives the current value as its
/// first `next`, then live pushes. After termination, subscribers receive
/// only the terminal notification; the stored value is no longer offered.
pub struct BehaviorSubject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> BehaviorSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new(initial: Item) -> Self {
    BehaviorSubject { core: SubjectCore::new(Cache::Behavior(initial)) }
  }

  /// The value a subscriber would currently receive first.
  pub fn value(&self) -> Item {
    self
      .core
      .current_value()
      .expect("behavior subject always holds a value")
  }
}

impl_subject_api!(BehaviorSubject);
