//! Demand: how many more elements a consumer will accept.
//!
//! Demand is the currency of the backpressure protocol. A subscriber grants
//! demand through [`Subscription::request`](crate::subscription::Subscription),
//! a producer spends one unit per delivered element, and every
//! [`Subscriber::on_next`](crate::subscriber::Subscriber::on_next) return value
//! is folded back into the outstanding count.

use std::ops::{Add, AddAssign};

use crate::error::EngineError;

/// A finite non-negative count of acceptable elements, or no limit at all.
///
/// `Bounded(0)` means "no further elements accepted right now". Addition
/// saturates instead of overflowing, and `Unbounded` absorbs everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
  Bounded(u64),
  Unbounded,
}

impl Demand {
  /// No elements accepted right now. Equivalent to `Bounded(0)`.
  #[inline]
  pub const fn none() -> Self { Demand::Bounded(0) }

  #[inline]
  pub const fn bounded(count: u64) -> Self { Demand::Bounded(count) }

  #[inline]
  pub const fn unbounded() -> Self { Demand::Unbounded }

  #[inline]
  pub const fn is_unbounded(&self) -> bool { matches!(self, Demand::Unbounded) }

  /// `true` iff the demand is `Bounded(0)`: the consumer accepts nothing
  /// until it requests again.
  #[inline]
  pub const fn is_satisfied(&self) -> bool { matches!(self, Demand::Bounded(0)) }

  #[inline]
  pub const fn has_remaining(&self) -> bool { !self.is_satisfied() }

  /// Spend one unit of demand for delivering a single element.
  ///
  /// `Unbounded` is unchanged. `Bounded(0)` must never be asked to deliver;
  /// doing so returns [`EngineError::NoDemand`].
  pub fn decrement(self) -> Result<Demand, EngineError> {
    match self {
      Demand::Unbounded => Ok(Demand::Unbounded),
      Demand::Bounded(0) => Err(EngineError::NoDemand),
      Demand::Bounded(count) => Ok(Demand::Bounded(count - 1)),
    }
  }
}

impl Default for Demand {
  #[inline]
  fn default() -> Self { Demand::none() }
}

impl Add for Demand {
  type Output = Demand;

  fn add(self, rhs: Demand) -> Demand {
    match (self, rhs) {
      (Demand::Bounded(a), Demand::Bounded(b)) => {
        Demand::Bounded(a.saturating_add(b))
      }
      _ => Demand::Unbounded,
    }
  }
}

impl AddAssign for Demand {
  #[inline]
  fn add_assign(&mut self, rhs: Demand) { *self = *self + rhs; }
}

/// The boundary check for signed counts: a negative request is a caller
/// programming error and is rejected before any state changes.
impl TryFrom<i64> for Demand {
  type Error = EngineError;

  fn try_from(requested: i64) -> Result<Self, Self::Error> {
    if requested < 0 {
      Err(EngineError::InvalidDemand { requested })
    } else {
      Ok(Demand::Bounded(requested as u64))
    }
  }
}
