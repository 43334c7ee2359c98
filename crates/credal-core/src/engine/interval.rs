//! Probability intervals.
//!
//! An [`Interval`] is a pair `[low, high]` with `0 ≤ low ≤ high ≤ 1`. It is the
//! unit of imprecision throughout the engine: every table cell and every computed
//! marginal is one interval per state.

use std::fmt;

use crate::engine::errors::ExecError;

/// A closed probability interval `[low, high]`.
///
/// The endpoints are private so the ordering invariant cannot be broken after
/// construction. Use [`Interval::new`] for caller-supplied bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(f64, f64)", into = "(f64, f64)")
)]
pub struct Interval {
    low: f64,
    high: f64,
}

impl Interval {
    /// The vacuous interval `[0, 1]`: no information about the probability.
    pub const VACUOUS: Interval = Interval {
        low: 0.0,
        high: 1.0,
    };

    /// Creates an interval, rejecting non-finite, out-of-range, or inverted bounds.
    pub fn new(low: f64, high: f64) -> Result<Self, ExecError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(ExecError::ValidationError(format!(
                "interval bounds must be finite, got [{}, {}]",
                low, high
            )));
        }
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
            return Err(ExecError::ValidationError(format!(
                "interval bounds must lie in [0, 1], got [{}, {}]",
                low, high
            )));
        }
        if low > high {
            return Err(ExecError::ValidationError(format!(
                "interval lower bound exceeds upper bound: [{}, {}]",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    /// A degenerate interval `[p, p]` for a precisely known probability.
    pub fn point(p: f64) -> Result<Self, ExecError> {
        Self::new(p, p)
    }

    /// Builds an interval from bounds the engine computed itself.
    ///
    /// Endpoints are clamped into [0, 1] to absorb rounding in accumulated sums.
    pub(crate) fn from_computed(low: f64, high: f64) -> Result<Self, ExecError> {
        if low.is_nan() || high.is_nan() {
            return Err(ExecError::Numerical(format!(
                "computed interval is NaN: [{}, {}]",
                low, high
            )));
        }
        let low = low.clamp(0.0, 1.0);
        let high = high.clamp(0.0, 1.0).max(low);
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, p: f64) -> bool {
        self.low <= p && p <= self.high
    }

    /// True when `other` lies entirely within `self`.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.low <= other.low && other.high <= self.high
    }

    pub fn is_point(&self) -> bool {
        self.low == self.high
    }

    /// Multiplies both endpoints by a probability weight in [0, 1].
    pub fn scale(&self, weight: f64) -> Result<Self, ExecError> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(ExecError::ValidationError(format!(
                "interval scale weight must lie in [0, 1], got {}",
                weight
            )));
        }
        Ok(Self {
            low: self.low * weight,
            high: self.high * weight,
        })
    }

    /// Smallest interval containing both `self` and `other`.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

impl TryFrom<(f64, f64)> for Interval {
    type Error = ExecError;

    fn try_from((low, high): (f64, f64)) -> Result<Self, Self::Error> {
        Interval::new(low, high)
    }
}

impl From<Interval> for (f64, f64) {
    fn from(interval: Interval) -> Self {
        (interval.low, interval.high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.low, self.high)
    }
}
