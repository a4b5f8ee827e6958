//! The live handle connecting one producer to one subscriber.

use std::{fmt, sync::Arc};

use crate::demand::Demand;

/// Producer-side hooks behind a [`Subscription`].
///
/// Stateful producers implement this with their per-attachment conduit; all
/// three operations must be callable from any thread and re-entrantly from
/// within subscriber callbacks.
pub trait SubscriptionLike: Send + Sync {
  /// Add `demand` to the outstanding demand tracked for this attachment.
  /// No-op once the attachment is closed.
  fn request(&self, demand: Demand);

  /// Idempotent. Marks the attachment dead: no further value is delivered,
  /// and no terminal event either. An element mid-delivery still completes.
  fn cancel(&self);

  /// `true` after `cancel` or after a terminal event was delivered.
  fn is_closed(&self) -> bool;
}

/// Cloneable consumer handle for one active attachment.
///
/// The consumer uses it to grant demand and to cancel; it owns no data and
/// routes every call back to the producer's [`SubscriptionLike`] hooks.
#[derive(Clone)]
pub struct Subscription(Arc<dyn SubscriptionLike>);

impl Subscription {
  pub fn new(link: impl SubscriptionLike + 'static) -> Self {
    Subscription(Arc::new(link))
  }

  pub(crate) fn from_arc(link: Arc<dyn SubscriptionLike>) -> Self {
    Subscription(link)
  }

  #[inline]
  pub fn request(&self, demand: Demand) { self.0.request(demand) }

  #[inline]
  pub fn cancel(&self) { self.0.cancel() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}
