//! Subject variant that retains the latest value.
//!
//! Semantically a [`Subject`] wrapped around a stored `Item`: sending updates
//! the stored value then broadcasts, and every new subscriber is brought up
//! to date with the retained value immediately after attaching. The retained
//! value survives termination for [`value`](CurrentValueSubject::value)
//! readers, but is not replayed after a terminal event.

use std::sync::{Arc, Mutex};

use crate::{
  publisher::Publisher,
  subject::Subject,
  subscriber::Subscriber,
  subscription::Subscription,
};

pub struct CurrentValueSubject<Item, Err> {
  subject: Subject<Item, Err>,
  value: Arc<Mutex<Item>>,
}

impl<Item, Err> Clone for CurrentValueSubject<Item, Err> {
  fn clone(&self) -> Self {
    CurrentValueSubject {
      subject: self.subject.clone(),
      value: self.value.clone(),
    }
  }
}

impl<Item, Err> CurrentValueSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new(initial: Item) -> Self {
    CurrentValueSubject {
      subject: Subject::new(),
      value: Arc::new(Mutex::new(initial)),
    }
  }

  /// Snapshot of the retained value.
  pub fn value(&self) -> Item { self.value.lock().unwrap().clone() }

  /// Update the retained value and broadcast it.
  ///
  /// After a terminal event neither happens; the value stored before
  /// termination stays readable.
  pub fn next(&self, value: Item) {
    // terminal check and value update are one step, so a concurrent
    // `complete` cannot slip between them
    {
      let state = self.subject.state.lock().unwrap();
      if state.terminal.is_some() {
        return;
      }
      *self.value.lock().unwrap() = value.clone();
    }
    self.subject.next(value);
  }

  /// Write accessor for the retained value. Equivalent to
  /// [`next`](Self::next): the value is stored and broadcast.
  pub fn set_value(&self, value: Item) { self.next(value); }

  pub fn complete(&self) { self.subject.complete(); }

  pub fn error(&self, err: Err) { self.subject.error(err); }

  pub fn is_closed(&self) -> bool { self.subject.is_closed() }

  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }
}

impl<Item, Err> Publisher<Item, Err> for CurrentValueSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  /// Attaches the subscriber and replays the retained value to it.
  ///
  /// The replay spends one unit of the subscriber's demand when any is
  /// outstanding, but is delivered even at zero demand; only subsequent
  /// broadcasts are subject to the drop rule. A subscriber attaching after a
  /// terminal event receives only that terminal.
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    let replay = self.value.lock().unwrap().clone();
    self.subject.register(Box::new(subscriber), Some(replay))
  }
}
