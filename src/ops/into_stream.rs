use std::{
  pin::Pin,
  task::{Context, Poll},
};

use futures::{
  channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
  Stream,
};

use crate::{
  notification::Notification,
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// A [`futures::Stream`] view of an observable.
///
/// Values arrive as `Ok`, the terminal error as one final `Err`, and
/// completion ends the stream. Dropping the stream unsubscribes from the
/// source.
pub struct ObservableStream<Item, Err> {
  receiver: UnboundedReceiver<Notification<Item, Err>>,
  subscription: Subscription,
  done: bool,
}

impl<Item, Err> ObservableStream<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  pub(crate) fn new<S>(source: S) -> Self
  where
    S: Observable<Item = Item, Err = Err>,
  {
    let (sender, receiver) = unbounded();
    let handle = Subscription::new();
    let upstream =
      source.actual_subscribe(Subscriber::new(ChannelObserver { sender }, handle.clone()));
    handle.add(upstream);
    ObservableStream { receiver, subscription: handle, done: false }
  }
}

impl<Item, Err> Stream for ObservableStream<Item, Err> {
  type Item = Result<Item, Err>;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    if self.done {
      return Poll::Ready(None);
    }
    match Pin::new(&mut self.receiver).poll_next(cx) {
      Poll::Ready(Some(Notification::Next(value))) => Poll::Ready(Some(Ok(value))),
      Poll::Ready(Some(Notification::Err(err))) => {
        self.done = true;
        Poll::Ready(Some(Err(err)))
      }
      Poll::Ready(Some(Notification::Complete)) | Poll::Ready(None) => {
        self.done = true;
        Poll::Ready(None)
      }
      Poll::Pending => Poll::Pending,
    }
  }
}

impl<Item, Err> Drop for ObservableStream<Item, Err> {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}

struct ChannelObserver<Item, Err> {
  sender: UnboundedSender<Notification<Item, Err>>,
}

impl<Item, Err> Observer<Item, Err> for ChannelObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let _ = self.sender.unbounded_send(Notification::Next(value));
  }

  fn error(&mut self, err: Err) {
    let _ = self.sender.unbounded_send(Notification::Err(err));
  }

  fn complete(&mut self) {
    let _ = self.sender.unbounded_send(Notification::Complete);
  }

  fn is_closed(&self) -> bool { self.sender.is_closed() }
}
