use std::marker::PhantomData;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Emission stops early if the observer closes, so `from_iter` composes
/// with `take` without draining the whole iterator.
///
/// # Arguments
///
/// * `iter` - An iterator to get all the values from.
///
/// # Examples
///
/// A simple example for a range:
///
/// ```
/// use ripple::prelude::*;
///
/// observable::from_iter(0..10).subscribe(|v| println!("{},", v));
/// ```
///
/// Or with a vector:
///
/// ```
/// use ripple::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{},", v));
/// ```
pub fn from_iter<Iter, Err>(iter: Iter) -> FromIterObservable<Iter, Err>
where
  Iter: IntoIterator,
{
  FromIterObservable { iter, _marker: PhantomData }
}

#[derive(Clone)]
pub struct FromIterObservable<Iter, Err> {
  iter: Iter,
  _marker: PhantomData<Err>,
}

impl<Iter, Err> Observable for FromIterObservable<Iter, Err>
where
  Iter: IntoIterator,
{
  type Item = Iter::Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Iter::Item, Err> + Send + 'static,
  {
    for value in self.iter {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(value);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::closed()
  }
}

/// Creates an observable emitting the `count` integers starting at
/// `start`, then completing.
pub fn range<Err>(start: i64, count: u64) -> FromIterObservable<std::ops::Range<i64>, Err> {
  let end = start.saturating_add(count as i64);
  from_iter(start..end)
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::prelude::*;

  #[test]
  fn from_range() {
    let hit_count = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicBool::new(false));
    let c_hits = hit_count.clone();
    let c_completed = completed.clone();

    observable::from_iter(0..100).subscribe_all(
      move |_| {
        c_hits.fetch_add(1, Ordering::Relaxed);
      },
      |err: std::convert::Infallible| match err {},
      move || c_completed.store(true, Ordering::Relaxed),
    );

    assert_eq!(hit_count.load(Ordering::Relaxed), 100);
    assert!(completed.load(Ordering::Relaxed));
  }

  #[test]
  fn from_vec() {
    let sum = Arc::new(AtomicUsize::new(0));
    let c_sum = sum.clone();

    observable::from_iter(vec![1usize, 2, 3, 4]).subscribe(move |v| {
      c_sum.fetch_add(v, Ordering::Relaxed);
    });

    assert_eq!(sum.load(Ordering::Relaxed), 10);
  }

  #[test]
  fn range_counts_from_start() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::range(5, 3).subscribe(move |v| c_values.lock().unwrap().push(v));

    assert_eq!(*values.lock().unwrap(), vec![5, 6, 7]);
  }
}
