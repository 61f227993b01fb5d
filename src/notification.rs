/// A single event on a stream: a value, a failure, or the end of the
/// sequence.
///
/// `Err` and `Complete` are terminal: once one of them has been delivered
/// to an observer, nothing more may be delivered through that subscription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification<Item, Err> {
  Next(Item),
  Err(Err),
  Complete,
}

impl<Item, Err> Notification<Item, Err> {
  /// Whether this notification ends the stream for its observer.
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  /// Transform the carried value, leaving terminal notifications untouched.
  pub fn map<B, F>(self, f: F) -> Notification<B, Err>
  where
    F: FnOnce(Item) -> B,
  {
    match self {
      Notification::Next(v) => Notification::Next(f(v)),
      Notification::Err(e) => Notification::Err(e),
      Notification::Complete => Notification::Complete,
    }
  }
}
