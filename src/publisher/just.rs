//! Single-value producer.

use std::{convert::Infallible, iter};

use crate::{
  publisher::{from_iter::PullConduit, Publisher},
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Creates a publisher that delivers exactly one precomputed value, then
/// completes.
///
/// Every subscription replays the value independently; it is a per-subscriber
/// emission, not a broadcast of a single firing. The value is withheld until
/// the subscriber requests at least one element; a subscriber that never
/// requests receives neither the value nor completion.
///
/// # Examples
///
/// ```
/// use backflow::prelude::*;
///
/// just(123).subscribe(FnSubscriber::new(|v| println!("{v}")));
/// ```
pub fn just<Item>(value: Item) -> Just<Item> { Just(value) }

#[derive(Clone)]
pub struct Just<Item>(Item);

impl<Item> Publisher<Item, Infallible> for Just<Item>
where
  Item: Clone + Send + 'static,
{
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<Item, Infallible> + Send + 'static,
  {
    PullConduit::attach(iter::once(self.0.clone()), Box::new(subscriber))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    demand::Demand,
    subscriber::{FnSubscriber, Terminal},
  };
  use std::sync::{Arc, Mutex};

  struct Gated {
    values: Arc<Mutex<Vec<i32>>>,
    completions: Arc<Mutex<usize>>,
    subscription: Arc<Mutex<Option<Subscription>>>,
    initial: Demand,
  }

  impl Subscriber<i32, Infallible> for Gated {
    fn on_subscribe(&mut self, subscription: Subscription) {
      *self.subscription.lock().unwrap() = Some(subscription.clone());
      subscription.request(self.initial);
    }

    fn on_next(&mut self, value: i32) -> Demand {
      self.values.lock().unwrap().push(value);
      Demand::none()
    }

    fn on_terminal(&mut self, terminal: Terminal<Infallible>) {
      assert!(terminal.is_completed());
      *self.completions.lock().unwrap() += 1;
    }
  }

  #[test]
  fn independent_replay_per_subscriber() {
    let source = just(42);

    let first = Arc::new(Mutex::new(Vec::new()));
    let first_sink = first.clone();
    source.subscribe(FnSubscriber::new(move |v| {
      first_sink.lock().unwrap().push(v)
    }));

    let second = Arc::new(Mutex::new(Vec::new()));
    let second_sink = second.clone();
    source.subscribe(FnSubscriber::new(move |v| {
      second_sink.lock().unwrap().push(v)
    }));

    // not shared or consumed once: both see the value
    assert_eq!(*first.lock().unwrap(), vec![42]);
    assert_eq!(*second.lock().unwrap(), vec![42]);
  }

  #[test]
  fn value_withheld_until_requested() {
    let gated = Gated {
      values: Arc::new(Mutex::new(Vec::new())),
      completions: Arc::new(Mutex::new(0)),
      subscription: Arc::new(Mutex::new(None)),
      initial: Demand::none(),
    };
    let values = gated.values.clone();
    let completions = gated.completions.clone();
    let handle = gated.subscription.clone();

    just(7).subscribe(gated);

    // zero demand at subscribe time: no value, no completion
    assert!(values.lock().unwrap().is_empty());
    assert_eq!(*completions.lock().unwrap(), 0);

    handle.lock().unwrap().as_ref().unwrap().request(Demand::bounded(1));
    assert_eq!(*values.lock().unwrap(), vec![7]);
    assert_eq!(*completions.lock().unwrap(), 1);
  }

  #[test]
  fn completes_right_after_the_value() {
    let gated = Gated {
      values: Arc::new(Mutex::new(Vec::new())),
      completions: Arc::new(Mutex::new(0)),
      subscription: Arc::new(Mutex::new(None)),
      initial: Demand::bounded(1),
    };
    let completions = gated.completions.clone();

    let subscription = just(1).subscribe(gated);

    assert_eq!(*completions.lock().unwrap(), 1);
    assert!(subscription.is_closed());
  }
}
