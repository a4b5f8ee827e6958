//! Immediate-failure producer.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  demand::Demand,
  publisher::Publisher,
  subscriber::{Subscriber, Terminal},
  subscription::{Subscription, SubscriptionLike},
};

/// Creates a publisher that delivers no values and terminates every
/// subscriber with the given failure right after `on_subscribe`.
///
/// Terminal events consume no demand, so the failure arrives even when the
/// subscriber requested nothing.
pub fn fail<Err>(err: Err) -> Fail<Err> { Fail(err) }

#[derive(Clone)]
pub struct Fail<Err>(Err);

impl<Item, Err> Publisher<Item, Err> for Fail<Err>
where
  Err: Clone + Send + 'static,
{
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    let conduit = Arc::new(SettledConduit::default());
    let subscription = Subscription::from_arc(conduit.clone());
    let mut subscriber = subscriber;
    subscriber.on_subscribe(subscription.clone());
    // cancelled inside on_subscribe: no terminal either
    if !conduit.is_closed() {
      conduit.settle();
      subscriber.on_terminal(Terminal::Failed(self.0.clone()));
    }
    subscription
  }
}

/// Conduit for producers whose outcome is fixed at attach time: demand is
/// irrelevant, only the closed flag matters.
#[derive(Default)]
struct SettledConduit {
  closed: AtomicBool,
}

impl SettledConduit {
  fn settle(&self) { self.closed.store(true, Ordering::Relaxed); }
}

impl SubscriptionLike for SettledConduit {
  fn request(&self, _demand: Demand) {}

  fn cancel(&self) { self.closed.store(true, Ordering::Relaxed); }

  fn is_closed(&self) -> bool { self.closed.load(Ordering::Relaxed) }
}
