//! Subscriber trait and adapters.
//!
//! A Subscriber is the consumer side of the protocol. It receives its
//! [`Subscription`] synchronously before the attaching call returns, one
//! element per `on_next` while demand permits, and exactly one terminal
//! event.

use crate::{demand::Demand, subscription::Subscription};

/// The event that ends the protocol for one subscriber: successful
/// completion, or an application-defined failure value the engine never
/// interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal<Err> {
  Completed,
  Failed(Err),
}

impl<Err> Terminal<Err> {
  #[inline]
  pub fn is_completed(&self) -> bool { matches!(self, Terminal::Completed) }

  #[inline]
  pub fn is_failed(&self) -> bool { matches!(self, Terminal::Failed(_)) }
}

/// The consumer contract: three callbacks, driven by the producer.
///
/// `on_subscribe` is where initial demand is requested; a subscriber that
/// never requests receives no values. `on_next` returns *additional* demand
/// which the producer adds to the outstanding count for this attachment.
/// `on_terminal` is invoked at most once, after which no event of any kind is
/// delivered.
pub trait Subscriber<Item, Err> {
  /// Receive the live handle for this attachment. Runs synchronously inside
  /// the producer's subscribe call, before it returns.
  fn on_subscribe(&mut self, subscription: Subscription);

  /// Receive one element. The returned demand is folded into the
  /// outstanding demand for this attachment.
  fn on_next(&mut self, value: Item) -> Demand;

  /// Receive completion or failure, exactly once.
  fn on_terminal(&mut self, terminal: Terminal<Err>);
}

impl<Item, Err, S> Subscriber<Item, Err> for Box<S>
where
  S: Subscriber<Item, Err> + ?Sized,
{
  #[inline]
  fn on_subscribe(&mut self, subscription: Subscription) {
    (**self).on_subscribe(subscription)
  }

  #[inline]
  fn on_next(&mut self, value: Item) -> Demand { (**self).on_next(value) }

  #[inline]
  fn on_terminal(&mut self, terminal: Terminal<Err>) {
    (**self).on_terminal(terminal)
  }
}

/// Boxed subscriber handed across the object-safety boundary.
pub type BoxedSubscriber<Item, Err> = Box<dyn Subscriber<Item, Err> + Send>;

/// Closure adapter for the common "just give me everything" consumer.
///
/// Requests `Unbounded` on subscribe and returns `Demand::none()` per
/// element, so the producer is never throttled. Terminal events are ignored
/// unless a hook is installed with [`with_terminal`](Self::with_terminal).
///
/// ```rust
/// use backflow::prelude::*;
///
/// just("hello").subscribe(FnSubscriber::new(|v| println!("{v}")));
/// ```
pub struct FnSubscriber<F, Err> {
  next: F,
  terminal: Option<Box<dyn FnMut(Terminal<Err>) + Send>>,
}

impl<F, Err> FnSubscriber<F, Err> {
  pub fn new(next: F) -> Self { FnSubscriber { next, terminal: None } }

  /// Install a hook invoked for the terminal event.
  pub fn with_terminal(
    mut self, terminal: impl FnMut(Terminal<Err>) + Send + 'static,
  ) -> Self {
    self.terminal = Some(Box::new(terminal));
    self
  }
}

impl<F, Item, Err> Subscriber<Item, Err> for FnSubscriber<F, Err>
where
  F: FnMut(Item),
{
  fn on_subscribe(&mut self, subscription: Subscription) {
    subscription.request(Demand::unbounded());
  }

  fn on_next(&mut self, value: Item) -> Demand {
    (self.next)(value);
    Demand::none()
  }

  fn on_terminal(&mut self, terminal: Terminal<Err>) {
    if let Some(hook) = self.terminal.as_mut() {
      hook(terminal);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::convert::Infallible;

  struct Recording {
    values: Vec<i32>,
  }

  impl Subscriber<i32, Infallible> for Recording {
    fn on_subscribe(&mut self, subscription: Subscription) {
      subscription.request(Demand::unbounded());
    }

    fn on_next(&mut self, value: i32) -> Demand {
      self.values.push(value);
      Demand::none()
    }

    fn on_terminal(&mut self, _terminal: Terminal<Infallible>) {}
  }

  #[test]
  fn boxed_subscriber_delegates() {
    let mut boxed: BoxedSubscriber<i32, Infallible> =
      Box::new(Recording { values: vec![] });
    assert_eq!(boxed.on_next(1), Demand::none());
    assert_eq!(boxed.on_next(2), Demand::none());
  }

  #[test]
  fn fn_subscriber_forwards_values() {
    let mut sum = 0;
    {
      let mut subscriber = FnSubscriber::<_, Infallible>::new(|v: i32| sum += v);
      subscriber.on_next(10);
      subscriber.on_next(20);
    }
    assert_eq!(sum, 30);
  }

  #[test]
  fn fn_subscriber_terminal_hook() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook_seen = seen.clone();
    let mut subscriber = FnSubscriber::new(|_v: i32| {}).with_terminal(
      move |t: Terminal<&'static str>| hook_seen.lock().unwrap().push(t),
    );
    subscriber.on_terminal(Terminal::Failed("boom"));
    assert_eq!(*seen.lock().unwrap(), vec![Terminal::Failed("boom")]);
  }
}
