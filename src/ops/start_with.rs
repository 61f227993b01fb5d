use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Emits the given values before anything the source emits.
pub struct StartWithOp<S: Observable> {
  source: S,
  values: Vec<S::Item>,
}

impl<S> Clone for StartWithOp<S>
where
  S: Observable + Clone,
  S::Item: Clone,
{
  fn clone(&self) -> Self {
    StartWithOp { source: self.source.clone(), values: self.values.clone() }
  }
}

impl<S: Observable> StartWithOp<S> {
  pub(crate) fn new(source: S, values: Vec<S::Item>) -> Self { StartWithOp { source, values } }
}

impl<S> Observable for StartWithOp<S>
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    for value in self.values {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(value);
    }
    self.source.actual_subscribe(observer)
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn prefixed_values_come_first() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::from_iter(3..5)
      .start_with(vec![0, 1, 2])
      .subscribe(move |v| c_values.lock().unwrap().push(v));

    assert_eq!(*values.lock().unwrap(), vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn take_can_end_inside_the_prefix() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();

    observable::from_iter(3..5)
      .start_with(vec![0, 1, 2])
      .take(2)
      .subscribe(move |v| c_values.lock().unwrap().push(v));

    assert_eq!(*values.lock().unwrap(), vec![0, 1]);
  }
}
