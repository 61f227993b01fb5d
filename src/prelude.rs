//! Convenient one-line import of the crate's surface.
//!
//! ```rust
//! use ripple::prelude::*;
//! ```

pub use crate::{
  error::StreamError,
  notification::Notification,
  observable,
  observable::{Emitter, EventSource, Observable},
  observer::Observer,
  subject::{AsyncSubject, BehaviorSubject, ReplaySubject, Subject},
  subscription::{Subscription, SubscriptionGuard, SubscriptionLike, TearDown},
};
