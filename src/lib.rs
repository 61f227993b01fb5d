//! # ripple: a push-based observable stream engine
//!
//! An event-broadcast primitive with subscription lifecycle management and
//! operator composition: observables push values to observers, subjects
//! multicast hot streams, operators wrap one observable into another while
//! preserving the termination contract, and every subscribe call returns a
//! disposable [`Subscription`].
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use ripple::prelude::*;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let c_seen = seen.clone();
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(move |v| c_seen.lock().unwrap().push(v));
//!
//! assert_eq!(*seen.lock().unwrap(), vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | The core trait defining stream operations |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Hot multicast relay: observer and observable at once |
//!
//! Delivery is synchronous and in push order. Observers are `Send +
//! 'static`; subjects synchronize their broadcast set internally, so a
//! stream can be fed from one thread and observed from another. The only
//! threads the engine creates belong to the time-driven sources
//! ([`observable::interval`] and [`observable::timer`]), and each of those
//! is cancelled through its subscription's teardown.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject

pub mod error;
pub mod notification;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod subject;
pub mod subscriber;
pub mod subscription;

mod scheduler;

pub use prelude::*;
