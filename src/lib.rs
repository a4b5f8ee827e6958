//! # backflow: a pull-regulated publish/subscribe engine
//!
//! Producers deliver values only against demand their subscribers have
//! explicitly requested, so a slow consumer throttles its producer instead of
//! being buried by it.
//!
//! ## Quick Start
//!
//! ```rust
//! use backflow::prelude::*;
//!
//! from_iter(0..10).subscribe(FnSubscriber::new(|v| println!("Value: {v}")));
//!
//! let subject = Subject::<i32, &'static str>::new();
//! subject.subscribe(FnSubscriber::new(|v| println!("Broadcast: {v}")));
//! subject.next(1);
//! subject.complete();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Demand`] | How many elements a subscriber is willing to receive |
//! | [`Publisher`] | The producer contract: attach a subscriber |
//! | [`Subscriber`] | Consumes `on_next` and a single terminal event |
//! | [`Subscription`] | Handle to request demand or cancel an attachment |
//! | [`Subject`] | Imperative sink broadcasting to many subscribers |
//! | [`CurrentValueSubject`] | Subject retaining and replaying the latest value |
//! | [`CancellationBag`] | Cancels a group of subscriptions on drop |
//!
//! Delivery is cooperative and synchronous: events run on the thread that
//! sends them, and subscriber callbacks may re-enter the engine (request
//! more, cancel, or push further values into a subject) without deadlocking.
//!
//! [`Demand`]: demand::Demand
//! [`Publisher`]: publisher::Publisher
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`CurrentValueSubject`]: current_value_subject::CurrentValueSubject
//! [`CancellationBag`]: bag::CancellationBag

pub mod bag;
pub mod current_value_subject;
pub mod demand;
pub mod error;
pub mod prelude;
pub mod publisher;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
