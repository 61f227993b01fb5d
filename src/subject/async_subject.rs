use super::{impl_subject_api, Cache, SubjectCore};
use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// A subject that reveals only its final value.
///
/// Pushes are invisible while the subject is active; only `complete`
/// releases the last pushed value, delivered as `next(last)` immediately
/// followed by `complete` to every observer, including ones subscribing
/// after completion. Completing without a pushed value just completes, and
/// an error discards the stored value.
pub struct AsyncSubject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> AsyncSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new() -> Self { AsyncSubject { core: SubjectCore::new(Cache::Last(None)) } }
}

impl<Item, Err> Default for AsyncSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn default() -> Self { Self::new() }
}

impl_subject_api!(AsyncSubject);
