use std::{marker::PhantomData, sync::Arc};

use crate::{
  observable::Observable, observer::Observer, subscriber::ObserverSlot, subscription::Subscription,
};

/// A callback-registration capability: anything with add-handler /
/// remove-handler semantics, like a UI event or a device notification.
///
/// `register` installs the handler and returns the action that removes it
/// again. One value bridges one event source; [`from_event`] runs the
/// removal action when the subscription is disposed.
pub trait EventSource {
  type Item;

  fn register(self, handler: Box<dyn FnMut(Self::Item) + Send>) -> Box<dyn FnOnce() + Send>;
}

/// Creates an observable from a callback-registration capability.
///
/// Event streams are hot and never terminate on their own; disposing the
/// subscription unregisters the handler.
pub fn from_event<S, Err>(source: S) -> FromEventObservable<S, Err>
where
  S: EventSource,
{
  FromEventObservable { source, _marker: PhantomData }
}

#[derive(Clone)]
pub struct FromEventObservable<S, Err> {
  source: S,
  _marker: PhantomData<Err>,
}

impl<S, Err> Observable for FromEventObservable<S, Err>
where
  S: EventSource,
  S::Item: 'static,
  Err: 'static,
{
  type Item = S::Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item, Err> + Send + 'static,
  {
    let slot = Arc::new(ObserverSlot::new(Box::new(observer)));
    let handler_slot = slot.clone();
    let unregister = self
      .source
      .register(Box::new(move |value| handler_slot.next(value)));
    let handle = Subscription::new();
    handle.add_action(move || {
      slot.dispose();
      unregister();
    });
    handle
  }
}
