use std::{convert::Infallible, sync::Arc, time::Duration};

use crate::{
  observable::Observable, observer::Observer, scheduler, subscriber::ObserverSlot,
  subscription::Subscription,
};

/// Creates an observable which will fire `period` into the future and
/// repeat every `period` after, counting ticks from zero.
///
/// Each subscription owns a dedicated ticker thread; unsubscribing stops
/// the thread. The stream never completes on its own, so bound it with
/// `take` or keep the subscription handle.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use ripple::prelude::*;
///
/// let ticks = observable::interval(Duration::from_secs(1))
///   .subscribe(|seq| println!("tick {}", seq));
/// std::thread::sleep(Duration::from_secs(3));
/// ticks.unsubscribe();
/// ```
pub fn interval(period: Duration) -> IntervalObservable {
  IntervalObservable { period }
}

#[derive(Clone)]
pub struct IntervalObservable {
  period: Duration,
}

impl Observable for IntervalObservable {
  type Item = u64;
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<u64, Infallible> + Send + 'static,
  {
    let slot = Arc::new(ObserverSlot::new(Box::new(observer)));
    let ticker = {
      let slot = slot.clone();
      scheduler::spawn_ticker("interval", self.period, Some(self.period), move |seq| {
        slot.next(seq);
        slot.is_live()
      })
    };
    let handle = Subscription::new();
    handle.add_action(move || {
      slot.dispose();
      ticker.cancel();
    });
    handle
  }
}
