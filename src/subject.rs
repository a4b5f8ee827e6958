//! Subject: a publisher that is also an imperative sink.
//!
//! External code pushes events in with [`next`](Subject::next),
//! [`complete`](Subject::complete) and [`error`](Subject::error); the subject
//! fans each event out to every currently attached subscriber, enforcing
//! demand accounting per subscriber. A subscriber whose outstanding demand is
//! `Bounded(0)` is skipped for that value; a subject never buffers for
//! under-demanding subscribers.

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex},
};

use crate::{
  demand::Demand,
  publisher::Publisher,
  subscriber::{BoxedSubscriber, Subscriber, Terminal},
  subscription::{Subscription, SubscriptionLike},
};

pub struct Subject<Item, Err> {
  pub(crate) state: Arc<Mutex<SubjectState<Item, Err>>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Subject { state: self.state.clone() } }
}

pub(crate) struct SubjectState<Item, Err> {
  // ordered by attachment; closed entries are pruned lazily
  pub(crate) registrations: Vec<RegistrationRef<Item, Err>>,
  // first writer wins; permanently set once a terminal event is sent
  pub(crate) terminal: Option<Terminal<Err>>,
  // events staged while a dispatch is already running (re-entrant or
  // concurrent senders); drained by the single active dispatch loop
  pub(crate) queue: VecDeque<Event<Item, Err>>,
  pub(crate) dispatching: bool,
}

pub(crate) type RegistrationRef<Item, Err> =
  Arc<Mutex<Registration<Item, Err>>>;

/// One producer–consumer pairing inside a subject: the subscriber slot, its
/// outstanding demand, and the liveness flag. The slot is taken out while its
/// own callback runs so no lock is held across subscriber code.
pub(crate) struct Registration<Item, Err> {
  pub(crate) subscriber: Option<BoxedSubscriber<Item, Err>>,
  pub(crate) demand: Demand,
  pub(crate) closed: bool,
}

pub(crate) enum Event<Item, Err> {
  Value(Item),
  Terminal(Terminal<Err>),
}

impl<Item, Err> Default for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn default() -> Self { Subject::new() }
}

impl<Item, Err> Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new() -> Self {
    Subject {
      state: Arc::new(Mutex::new(SubjectState {
        registrations: Vec::new(),
        terminal: None,
        queue: VecDeque::new(),
        dispatching: false,
      })),
    }
  }

  /// Push one value to every attached subscriber with outstanding demand.
  ///
  /// Subscribers at zero demand are skipped; the value is dropped for them.
  /// After a terminal event has been recorded this is a no-op.
  pub fn next(&self, value: Item) {
    {
      let mut state = self.state.lock().unwrap();
      if state.terminal.is_some() {
        return;
      }
      state.queue.push_back(Event::Value(value));
    }
    self.pump();
  }

  /// Record successful completion and deliver it once to every attached
  /// subscriber. Subsequent `next`/`complete`/`error` calls are no-ops.
  pub fn complete(&self) { self.terminate(Terminal::Completed); }

  /// Record a failure and deliver it once to every attached subscriber.
  /// Subsequent `next`/`complete`/`error` calls are no-ops.
  pub fn error(&self, err: Err) { self.terminate(Terminal::Failed(err)); }

  /// `true` once a terminal event has been recorded.
  pub fn is_closed(&self) -> bool {
    self.state.lock().unwrap().terminal.is_some()
  }

  /// Number of live attachments.
  pub fn subscriber_count(&self) -> usize {
    let state = self.state.lock().unwrap();
    state
      .registrations
      .iter()
      .filter(|r| !r.lock().unwrap().closed)
      .count()
  }

  fn terminate(&self, terminal: Terminal<Err>) {
    {
      let mut state = self.state.lock().unwrap();
      if state.terminal.is_some() {
        // first writer won already
        return;
      }
      tracing::debug!("subject terminal recorded");
      state.terminal = Some(terminal.clone());
      state.queue.push_back(Event::Terminal(terminal));
    }
    self.pump();
  }

  /// Drain staged events. Only one dispatch loop runs at a time; `next`
  /// calls made re-entrantly from a callback (or from another thread while a
  /// fan-out is running) stage their event and return, and the active loop
  /// picks it up. The registration list is snapshotted per event, so every
  /// subscriber live at the start of a fan-out is considered exactly once
  /// even if callbacks mutate the list.
  pub(crate) fn pump(&self) {
    {
      let mut state = self.state.lock().unwrap();
      if state.dispatching {
        return;
      }
      state.dispatching = true;
    }
    loop {
      let (event, snapshot) = {
        let mut state = self.state.lock().unwrap();
        let Some(event) = state.queue.pop_front() else {
          state.dispatching = false;
          return;
        };
        let snapshot = match &event {
          // terminal ends every current attachment; late subscribers are
          // served from the stored terminal instead
          Event::Terminal(_) => std::mem::take(&mut state.registrations),
          Event::Value(_) => {
            state.registrations.retain(|r| !r.lock().unwrap().closed);
            state.registrations.clone()
          }
        };
        (event, snapshot)
      };
      match event {
        Event::Value(value) => {
          for registration in &snapshot {
            deliver_value(registration, value.clone());
          }
        }
        Event::Terminal(terminal) => {
          for registration in &snapshot {
            deliver_terminal(registration, terminal.clone());
          }
        }
      }
    }
  }

  /// Attach a boxed subscriber, optionally replaying a retained value to it
  /// right after `on_subscribe` (the current-value variant uses this; the
  /// replay bypasses the zero-demand drop rule).
  pub(crate) fn register(
    &self, subscriber: BoxedSubscriber<Item, Err>, replay: Option<Item>,
  ) -> Subscription {
    let registration = Arc::new(Mutex::new(Registration {
      subscriber: Some(subscriber),
      demand: Demand::none(),
      closed: false,
    }));
    let subscription =
      Subscription::new(SubjectConduit { registration: registration.clone() });

    let stored_terminal = {
      let mut state = self.state.lock().unwrap();
      match state.terminal.clone() {
        Some(terminal) => Some(terminal),
        None => {
          state.registrations.retain(|r| !r.lock().unwrap().closed);
          state.registrations.push(registration.clone());
          None
        }
      }
    };

    // on_subscribe runs outside every lock so it may request, cancel, or
    // re-enter the subject
    let taken = registration.lock().unwrap().subscriber.take();
    if let Some(mut subscriber) = taken {
      subscriber.on_subscribe(subscription.clone());
      let mut reg = registration.lock().unwrap();
      if !reg.closed {
        reg.subscriber = Some(subscriber);
      }
    }

    match stored_terminal {
      Some(terminal) => deliver_terminal(&registration, terminal),
      None => {
        if let Some(value) = replay {
          deliver_replay(&registration, value);
        }
      }
    }
    subscription
  }
}

impl<Item, Err> Publisher<Item, Err> for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn subscribe<S>(&self, subscriber: S) -> Subscription
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    self.register(Box::new(subscriber), None)
  }
}

fn deliver_value<Item, Err>(
  registration: &RegistrationRef<Item, Err>, value: Item,
) {
  let mut subscriber = {
    let mut reg = registration.lock().unwrap();
    if reg.closed {
      return;
    }
    // zero outstanding demand: drop the value for this subscriber
    let Ok(rest) = reg.demand.decrement() else {
      return;
    };
    let Some(subscriber) = reg.subscriber.take() else {
      return;
    };
    reg.demand = rest;
    subscriber
  };
  let more = subscriber.on_next(value);
  let mut reg = registration.lock().unwrap();
  reg.demand += more;
  if !reg.closed {
    reg.subscriber = Some(subscriber);
  }
}

/// Delivery of a retained value to a brand-new subscriber. Exempt from the
/// zero-demand drop rule: demand is spent when available and left at zero
/// otherwise.
fn deliver_replay<Item, Err>(
  registration: &RegistrationRef<Item, Err>, value: Item,
) {
  let mut subscriber = {
    let mut reg = registration.lock().unwrap();
    if reg.closed {
      return;
    }
    let Some(subscriber) = reg.subscriber.take() else {
      return;
    };
    if let Ok(rest) = reg.demand.decrement() {
      reg.demand = rest;
    }
    subscriber
  };
  let more = subscriber.on_next(value);
  let mut reg = registration.lock().unwrap();
  reg.demand += more;
  if !reg.closed {
    reg.subscriber = Some(subscriber);
  }
}

fn deliver_terminal<Item, Err>(
  registration: &RegistrationRef<Item, Err>, terminal: Terminal<Err>,
) {
  let subscriber = {
    let mut reg = registration.lock().unwrap();
    if reg.closed {
      return;
    }
    reg.closed = true;
    reg.subscriber.take()
  };
  if let Some(mut subscriber) = subscriber {
    subscriber.on_terminal(terminal);
  }
}

struct SubjectConduit<Item, Err> {
  registration: RegistrationRef<Item, Err>,
}

impl<Item, Err> SubscriptionLike for SubjectConduit<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  fn request(&self, demand: Demand) {
    let mut reg = self.registration.lock().unwrap();
    if reg.closed {
      return;
    }
    reg.demand += demand;
  }

  fn cancel(&self) {
    let dropped = {
      let mut reg = self.registration.lock().unwrap();
      if reg.closed {
        return;
      }
      reg.closed = true;
      reg.subscriber.take()
    };
    // subscriber drop runs outside the registration lock
    if dropped.is_some() {
      tracing::trace!("subject subscription cancelled");
    }
  }

  fn is_closed(&self) -> bool { self.registration.lock().unwrap().closed }
}
