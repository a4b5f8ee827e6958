//! Scoped collection of subscriptions, cancelled together.

use smallvec::SmallVec;

use crate::subscription::Subscription;

/// Owns subscriptions and cancels every one of them when dropped or when
/// [`cancel_all`](CancellationBag::cancel_all) is called.
///
/// Typical use is tying a group of attachments to a scope: put each
/// subscription into the bag, and let the bag going out of scope tear all of
/// them down. Inserting prunes handles that already closed on their own, so a
/// long-lived bag does not accumulate dead entries.
#[derive(Default)]
pub struct CancellationBag {
  subscriptions: SmallVec<[Subscription; 1]>,
}

impl CancellationBag {
  pub fn new() -> Self { CancellationBag::default() }

  pub fn insert(&mut self, subscription: Subscription) {
    self.subscriptions.retain(|s| !s.is_closed());
    self.subscriptions.push(subscription);
  }

  /// Cancel and release every held subscription. The bag is reusable
  /// afterwards.
  pub fn cancel_all(&mut self) {
    for subscription in self.subscriptions.drain(..) {
      subscription.cancel();
    }
  }

  pub fn len(&self) -> usize { self.subscriptions.len() }

  pub fn is_empty(&self) -> bool { self.subscriptions.is_empty() }
}

impl Drop for CancellationBag {
  fn drop(&mut self) {
    if !self.subscriptions.is_empty() {
      tracing::trace!(count = self.subscriptions.len(), "bag teardown");
    }
    self.cancel_all();
  }
}

impl Extend<Subscription> for CancellationBag {
  fn extend<T: IntoIterator<Item = Subscription>>(&mut self, iter: T) {
    for subscription in iter {
      self.insert(subscription);
    }
  }
}
