//! Publisher contract and its object-safe mirror.

use crate::{
  subscriber::{BoxedSubscriber, Subscriber},
  subscription::Subscription,
};

pub mod boxed;
pub mod fail;
pub mod from_iter;
pub mod just;

/// The producer contract: attach a subscriber, hand back a [`Subscription`].
///
/// A Publisher must synchronously invoke the subscriber's `on_subscribe`
/// before `subscribe` returns, push elements only while outstanding demand
/// permits (spending one unit per element, folding every `on_next` return
/// back in), and deliver at most one terminal event.
pub trait Publisher<Item, Err> {
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<Item, Err> + Send + 'static;
}

/// Object-safe mirror of [`Publisher`].
///
/// `Publisher::subscribe` is generic over the subscriber and therefore not
/// usable through a vtable. `DynPublisher` narrows it to boxed subscribers so
/// producers can be type-erased; the blanket impl makes every publisher
/// automatically erasable.
pub trait DynPublisher<Item, Err> {
  fn dyn_subscribe(&self, subscriber: BoxedSubscriber<Item, Err>)
    -> Subscription;
}

impl<T, Item, Err> DynPublisher<Item, Err> for T
where
  T: Publisher<Item, Err>,
  Item: 'static,
  Err: 'static,
{
  fn dyn_subscribe(
    &self, subscriber: BoxedSubscriber<Item, Err>,
  ) -> Subscription {
    self.subscribe(subscriber)
  }
}
