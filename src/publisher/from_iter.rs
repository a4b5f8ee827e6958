//! Finite-sequence producer.

use std::{
  convert::Infallible,
  sync::{Arc, Mutex},
};

use crate::{
  demand::Demand,
  publisher::Publisher,
  subscriber::{BoxedSubscriber, Subscriber, Terminal},
  subscription::{Subscription, SubscriptionLike},
};

/// Creates a publisher that delivers the elements of an iterator in order.
///
/// Delivery respects outstanding demand: it pauses when demand is exhausted
/// and resumes when more is requested. Completion is sent right after the
/// last element; a subscriber that never requests past the last element never
/// sees it. The source is cloned per attachment, so every subscriber receives
/// the full sequence independently.
///
/// # Examples
///
/// ```
/// use backflow::prelude::*;
///
/// from_iter(0..4).subscribe(FnSubscriber::new(|v| println!("{v}")));
/// ```
pub fn from_iter<I>(iter: I) -> IterPublisher<I>
where
  I: IntoIterator + Clone,
{
  IterPublisher(iter)
}

#[derive(Clone)]
pub struct IterPublisher<I>(I);

impl<I> Publisher<I::Item, Infallible> for IterPublisher<I>
where
  I: IntoIterator + Clone,
  I::IntoIter: Send + 'static,
  I::Item: Send + 'static,
{
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<I::Item, Infallible> + Send + 'static,
  {
    PullConduit::attach(self.0.clone().into_iter(), Box::new(subscriber))
  }
}

/// Pull-driven conduit shared by the iterator-backed producers: delivery runs
/// inside `request`, on the caller's thread, until demand or the sequence is
/// exhausted.
pub(crate) struct PullConduit<I: Iterator, Err> {
  state: Mutex<PullState<I, Err>>,
}

struct PullState<I: Iterator, Err> {
  subscriber: Option<BoxedSubscriber<I::Item, Err>>,
  // One element is prefetched so exhaustion is discovered while demand still
  // permits pulling; completion itself consumes no demand.
  pending: Option<I::Item>,
  iter: I,
  demand: Demand,
  cancelled: bool,
  stopped: bool,
  // Guards against a nested drain when `on_next` re-enters `request`.
  delivering: bool,
}

impl<I, Err> PullConduit<I, Err>
where
  I: Iterator + Send + 'static,
  I::Item: Send + 'static,
  Err: 'static,
{
  pub(crate) fn attach(
    mut iter: I, subscriber: BoxedSubscriber<I::Item, Err>,
  ) -> Subscription {
    let pending = iter.next();
    let conduit = Arc::new(PullConduit {
      state: Mutex::new(PullState {
        subscriber: Some(subscriber),
        pending,
        iter,
        demand: Demand::none(),
        cancelled: false,
        stopped: false,
        delivering: true,
      }),
    });
    let subscription = Subscription::from_arc(conduit.clone());

    // on_subscribe runs outside the state lock; requests made inside it only
    // accumulate demand because `delivering` is still set.
    let taken = conduit.state.lock().unwrap().subscriber.take();
    if let Some(mut subscriber) = taken {
      subscriber.on_subscribe(subscription.clone());
      let mut state = conduit.state.lock().unwrap();
      if state.cancelled {
        state.delivering = false;
        return subscription;
      }
      state.subscriber = Some(subscriber);
    }
    conduit.drain();
    subscription
  }

  fn drain(&self) {
    loop {
      let mut state = self.state.lock().unwrap();
      if state.cancelled || state.stopped {
        state.delivering = false;
        return;
      }
      match state.pending.take() {
        None => {
          state.stopped = true;
          state.delivering = false;
          let subscriber = state.subscriber.take();
          drop(state);
          if let Some(mut subscriber) = subscriber {
            subscriber.on_terminal(Terminal::Completed);
          }
          return;
        }
        Some(value) if state.demand.is_satisfied() => {
          state.pending = Some(value);
          state.delivering = false;
          return;
        }
        Some(value) => {
          let rest = match state.demand.decrement() {
            Ok(rest) => rest,
            Err(_) => {
              debug_assert!(false, "delivery attempted at zero demand");
              state.pending = Some(value);
              state.delivering = false;
              return;
            }
          };
          state.demand = rest;
          state.pending = state.iter.next();
          let Some(mut subscriber) = state.subscriber.take() else {
            state.delivering = false;
            return;
          };
          drop(state);
          let more = subscriber.on_next(value);
          let mut state = self.state.lock().unwrap();
          state.demand += more;
          if state.cancelled {
            state.delivering = false;
            return;
          }
          state.subscriber = Some(subscriber);
        }
      }
    }
  }
}

impl<I, Err> SubscriptionLike for PullConduit<I, Err>
where
  I: Iterator + Send + 'static,
  I::Item: Send + 'static,
  Err: 'static,
{
  fn request(&self, demand: Demand) {
    let should_drain = {
      let mut state = self.state.lock().unwrap();
      if state.cancelled || state.stopped {
        return;
      }
      state.demand += demand;
      if state.delivering {
        // the running drain loop picks the new demand up
        false
      } else {
        state.delivering = true;
        true
      }
    };
    if should_drain {
      self.drain();
    }
  }

  fn cancel(&self) {
    let dropped = {
      let mut state = self.state.lock().unwrap();
      if state.cancelled || state.stopped {
        return;
      }
      state.cancelled = true;
      state.subscriber.take()
    };
    if dropped.is_some() {
      tracing::trace!("sequence subscription cancelled");
    }
  }

  fn is_closed(&self) -> bool {
    let state = self.state.lock().unwrap();
    state.cancelled || state.stopped
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{Arc, Mutex};

  // Recording subscriber with a scripted demand policy.
  struct Probe {
    values: Arc<Mutex<Vec<i32>>>,
    completions: Arc<Mutex<usize>>,
    subscription: Arc<Mutex<Option<Subscription>>>,
    initial: Demand,
    feedback: Box<dyn FnMut(i32) -> Demand + Send>,
  }

  impl Probe {
    fn new(initial: Demand) -> Self {
      Probe {
        values: Arc::new(Mutex::new(Vec::new())),
        completions: Arc::new(Mutex::new(0)),
        subscription: Arc::new(Mutex::new(None)),
        initial,
        feedback: Box::new(|_| Demand::none()),
      }
    }

    fn with_feedback(
      mut self, feedback: impl FnMut(i32) -> Demand + Send + 'static,
    ) -> Self {
      self.feedback = Box::new(feedback);
      self
    }
  }

  impl Subscriber<i32, Infallible> for Probe {
    fn on_subscribe(&mut self, subscription: Subscription) {
      *self.subscription.lock().unwrap() = Some(subscription.clone());
      subscription.request(self.initial);
    }

    fn on_next(&mut self, value: i32) -> Demand {
      self.values.lock().unwrap().push(value);
      (self.feedback)(value)
    }

    fn on_terminal(&mut self, terminal: Terminal<Infallible>) {
      assert!(terminal.is_completed());
      *self.completions.lock().unwrap() += 1;
    }
  }

  #[test]
  fn delivers_all_with_unbounded_demand() {
    let probe = Probe::new(Demand::unbounded());
    let values = probe.values.clone();
    let completions = probe.completions.clone();

    from_iter(1..=5).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(*completions.lock().unwrap(), 1);
  }

  #[test]
  fn pauses_at_demand_then_resumes_on_request() {
    let probe = Probe::new(Demand::bounded(3));
    let values = probe.values.clone();
    let completions = probe.completions.clone();
    let handle = probe.subscription.clone();

    let subscription = from_iter(1..=10).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*completions.lock().unwrap(), 0);

    handle.lock().unwrap().as_ref().unwrap().request(Demand::bounded(4));
    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(*completions.lock().unwrap(), 0);
    assert!(!subscription.is_closed());
  }

  #[test]
  fn demand_exhausted_withholds_completion() {
    // Six elements, three requested: the sequence is not finished, so no
    // terminal event may be delivered.
    let probe = Probe::new(Demand::bounded(3));
    let values = probe.values.clone();
    let completions = probe.completions.clone();

    from_iter(1..=6).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*completions.lock().unwrap(), 0);
  }

  #[test]
  fn dynamic_demand_feedback() {
    // Start with 2; +2 on seeing 1, +1 on seeing 3, else nothing. Outstanding
    // demand reaches zero exactly after the fifth element.
    let probe = Probe::new(Demand::bounded(2)).with_feedback(|v| match v {
      1 => Demand::bounded(2),
      3 => Demand::bounded(1),
      _ => Demand::none(),
    });
    let values = probe.values.clone();
    let completions = probe.completions.clone();

    from_iter(1..=6).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(*completions.lock().unwrap(), 0);
  }

  #[test]
  fn completion_follows_last_element_without_extra_demand() {
    let probe = Probe::new(Demand::bounded(3));
    let values = probe.values.clone();
    let completions = probe.completions.clone();

    from_iter(1..=3).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*completions.lock().unwrap(), 1);
  }

  #[test]
  fn empty_sequence_completes_at_attach() {
    let probe = Probe::new(Demand::none());
    let completions = probe.completions.clone();

    let subscription = from_iter(Vec::<i32>::new()).subscribe(probe);

    assert_eq!(*completions.lock().unwrap(), 1);
    assert!(subscription.is_closed());
  }

  #[test]
  fn reentrant_request_from_on_next() {
    let probe = Probe::new(Demand::bounded(1));
    let handle = probe.subscription.clone();
    let request_handle = probe.subscription.clone();
    let probe = probe.with_feedback(move |_| {
      // request through the subscription instead of the return value
      if let Some(s) = request_handle.lock().unwrap().as_ref() {
        s.request(Demand::bounded(1));
      }
      Demand::none()
    });
    let values = probe.values.clone();
    let completions = probe.completions.clone();

    from_iter(1..=4).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(*completions.lock().unwrap(), 1);
    assert!(handle.lock().unwrap().is_some());
  }

  #[test]
  fn cancel_mid_delivery_stops_the_stream() {
    let probe = Probe::new(Demand::unbounded());
    let cancel_handle = probe.subscription.clone();
    let probe = probe.with_feedback(move |v| {
      if v == 2 {
        cancel_handle.lock().unwrap().as_ref().unwrap().cancel();
      }
      Demand::none()
    });
    let values = probe.values.clone();
    let completions = probe.completions.clone();

    let subscription = from_iter(1..=10).subscribe(probe);

    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
    assert_eq!(*completions.lock().unwrap(), 0);
    assert!(subscription.is_closed());
  }

  #[test]
  fn each_subscriber_gets_an_independent_pass() {
    let source = from_iter(vec![7, 8]);

    let first = Probe::new(Demand::unbounded());
    let first_values = first.values.clone();
    source.subscribe(first);

    let second = Probe::new(Demand::unbounded());
    let second_values = second.values.clone();
    source.subscribe(second);

    assert_eq!(*first_values.lock().unwrap(), vec![7, 8]);
    assert_eq!(*second_values.lock().unwrap(), vec![7, 8]);
  }
}
