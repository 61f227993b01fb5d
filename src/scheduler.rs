//! Thread-backed ticker driving the time-based sources.
//!
//! One subscription to `interval` or `timer` owns one named thread. The
//! thread waits on a crossbeam channel so cancellation takes effect at the
//! next tick boundary at the latest.

use std::{thread, time::Duration};

use crossbeam_channel::{after, bounded, select, tick, Sender};
use tracing::trace;

pub(crate) struct TickerHandle {
  stop: Sender<()>,
}

impl TickerHandle {
  /// Ask the ticker thread to exit. Safe to call more than once and after
  /// the thread has already finished.
  pub(crate) fn cancel(&self) { let _ = self.stop.try_send(()); }
}

/// Spawn a named thread that calls `on_tick(seq)` once `due` has elapsed
/// and then every `period`. The thread exits when `on_tick` returns false,
/// when `period` is `None` after the first tick, or when the handle is
/// cancelled.
pub(crate) fn spawn_ticker<F>(
  name: &str, due: Duration, period: Option<Duration>, mut on_tick: F,
) -> TickerHandle
where
  F: FnMut(u64) -> bool + Send + 'static,
{
  let (stop, stopped) = bounded::<()>(1);
  let thread_name = format!("ripple-{name}");
  thread::Builder::new()
    .name(thread_name.clone())
    .spawn(move || {
      trace!(thread = %thread_name, "ticker started");
      let first = after(due);
      select! {
        recv(first) -> _ => {},
        recv(stopped) -> _ => {
          trace!(thread = %thread_name, "ticker cancelled before first tick");
          return;
        },
      }
      if !on_tick(0) {
        return;
      }
      let Some(period) = period else { return };
      let ticks = tick(period);
      let mut seq = 1u64;
      loop {
        select! {
          recv(ticks) -> _ => {
            if !on_tick(seq) {
              break;
            }
            seq += 1;
          },
          recv(stopped) -> _ => break,
        }
      }
      trace!(thread = %thread_name, "ticker stopped");
    })
    .expect("failed to spawn ticker thread");
  TickerHandle { stop }
}
