use std::{collections::VecDeque, time::Duration};

use super::{impl_subject_api, Cache, ReplayPolicy, SubjectCore};
use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// A subject with a bounded memory of past values.
///
/// Late subscribers receive the buffered history, oldest first, before any
/// live value; after termination they receive the surviving history and
/// then the terminal notification. Eviction is FIFO, bounded either by
/// element count or by age.
pub struct ReplaySubject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> ReplaySubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  /// Keep at most the last `count` values.
  pub fn with_capacity(count: usize) -> Self {
    ReplaySubject {
      core: SubjectCore::new(Cache::Replay {
        buffer: VecDeque::new(),
        policy: ReplayPolicy::Count(count),
      }),
    }
  }

  /// Keep values no older than `window`.
  pub fn with_window(window: Duration) -> Self {
    ReplaySubject {
      core: SubjectCore::new(Cache::Replay {
        buffer: VecDeque::new(),
        policy: ReplayPolicy::Window(window),
      }),
    }
  }
}

impl_subject_api!(ReplaySubject);
