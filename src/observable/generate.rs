use std::marker::PhantomData;

use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Creates an observable that unfolds a state value.
///
/// Starting from `seed`, emits `selector(&state)` while `condition(&state)`
/// holds, advancing with `state = iterate(state)` after each emission.
/// Completes exactly once, at the first state the condition rejects.
///
/// # Examples
///
/// Squares of the even numbers below ten:
///
/// ```
/// use ripple::prelude::*;
///
/// observable::generate(0, |s| *s < 10, |s| s + 2, |s| s * s)
///   .subscribe(|v| println!("{}", v));
/// ```
pub fn generate<St, C, I, R, Item, Err>(
  seed: St, condition: C, iterate: I, selector: R,
) -> GenerateObservable<St, C, I, R, Item, Err>
where
  C: FnMut(&St) -> bool,
  I: FnMut(St) -> St,
  R: FnMut(&St) -> Item,
{
  GenerateObservable { seed, condition, iterate, selector, _marker: PhantomData }
}

#[derive(Clone)]
pub struct GenerateObservable<St, C, I, R, Item, Err> {
  seed: St,
  condition: C,
  iterate: I,
  selector: R,
  _marker: PhantomData<(Item, Err)>,
}

impl<St, C, I, R, Item, Err> Observable for GenerateObservable<St, C, I, R, Item, Err>
where
  C: FnMut(&St) -> bool,
  I: FnMut(St) -> St,
  R: FnMut(&St) -> Item,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let GenerateObservable { seed, mut condition, mut iterate, mut selector, .. } = self;
    let mut state = seed;
    while condition(&state) {
      if observer.is_closed() {
        return Subscription::closed();
      }
      observer.next(selector(&state));
      state = iterate(state);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::closed()
  }
}
