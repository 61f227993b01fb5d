use std::{convert::Infallible, sync::Arc, time::Duration};

use crate::{
  observable::Observable, observer::Observer, scheduler, subscriber::ObserverSlot,
  subscription::Subscription,
};

/// Creates an observable that emits `0` once `due` has elapsed, then
/// completes.
///
/// Unsubscribing before the due time fires nothing and stops the timer
/// thread.
pub fn timer(due: Duration) -> TimerObservable {
  TimerObservable { due, period: None }
}

/// Creates an observable that emits `0` once `due` has elapsed, then
/// counts up every `period` without completing.
pub fn timer_periodic(due: Duration, period: Duration) -> TimerObservable {
  TimerObservable { due, period: Some(period) }
}

#[derive(Clone)]
pub struct TimerObservable {
  due: Duration,
  period: Option<Duration>,
}

impl Observable for TimerObservable {
  type Item = u64;
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<u64, Infallible> + Send + 'static,
  {
    let slot = Arc::new(ObserverSlot::new(Box::new(observer)));
    let one_shot = self.period.is_none();
    let ticker = {
      let slot = slot.clone();
      scheduler::spawn_ticker("timer", self.due, self.period, move |seq| {
        if one_shot {
          slot.finish_with(seq);
          false
        } else {
          slot.next(seq);
          slot.is_live()
        }
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
