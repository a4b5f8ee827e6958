//! Type-erased publisher.
//!
//! Erasure is a capability-narrowing adapter: a `Subject` handed to unrelated
//! code as a [`BoxedPublisher`] can be subscribed to, but its `next`/
//! `complete` surface is out of reach. Delivery behavior is unchanged.

use crate::{
  publisher::{DynPublisher, Publisher},
  subscriber::Subscriber,
  subscription::Subscription,
};

/// A publisher value exposing only the attach operation of its inner
/// producer.
pub struct BoxedPublisher<Item, Err>(
  Box<dyn DynPublisher<Item, Err> + Send + Sync>,
);

impl<Item, Err> BoxedPublisher<Item, Err> {
  pub fn new(
    publisher: impl DynPublisher<Item, Err> + Send + Sync + 'static,
  ) -> Self {
    BoxedPublisher(Box::new(publisher))
  }
}

impl<Item, Err> Publisher<Item, Err> for BoxedPublisher<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    self.0.dyn_subscribe(Box::new(subscriber))
  }
}

/// Extension trait turning any publisher into a [`BoxedPublisher`].
pub trait BoxIt<Item, Err>: Publisher<Item, Err> {
  fn box_it(self) -> BoxedPublisher<Item, Err>
  where
    Self: Sized + Send + Sync + 'static,
    Item: 'static,
    Err: 'static,
  {
    BoxedPublisher::new(self)
  }
}

impl<T, Item, Err> BoxIt<Item, Err> for T where T: Publisher<Item, Err> {}
