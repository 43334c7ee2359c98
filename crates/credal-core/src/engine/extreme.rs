//! Extreme distributions of an interval-valued marginal.
//!
//! For a marginal with `n` states, every state independently takes either its
//! lower or its upper endpoint, giving `2^n` corner vectors. Each corner is
//! renormalized to sum to one. Corners summing to zero cannot be renormalized
//! and are dropped; they would carry no probability mass.
//!
//! This corner set is an approximation of the vertices of the credal set
//! `{p : low_i ≤ p_i ≤ high_i, Σ p_i = 1}`. For two states it coincides with the
//! true vertices up to renormalization; for three or more states the true
//! vertices generally lie elsewhere on the box faces, so the resulting bounds are
//! not guaranteed to be tight.

use std::collections::BTreeMap;

use crate::engine::errors::ExecError;
use crate::engine::table::{StateBounds, StateLabel};

/// Largest state count whose `2^n` corners are enumerated.
pub const MAX_CORNER_STATES: usize = 30;

/// The renormalized low/high corners of one marginal.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeSet {
    states: Vec<StateLabel>,
    points: Vec<Vec<f64>>,
    degenerate: usize,
}

impl ExtremeSet {
    /// State labels; every point's weights are aligned with this order.
    pub fn states(&self) -> &[StateLabel] {
        &self.states
    }

    /// Number of usable (non-degenerate) corners.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Corners dropped because they summed to zero.
    pub fn degenerate(&self) -> usize {
        self.degenerate
    }

    pub fn point(&self, idx: usize) -> Option<&[f64]> {
        self.points.get(idx).map(Vec::as_slice)
    }

    pub fn points(&self) -> impl Iterator<Item = &[f64]> {
        self.points.iter().map(Vec::as_slice)
    }

    /// A corner as a state → weight map.
    pub fn distribution(&self, idx: usize) -> Option<BTreeMap<StateLabel, f64>> {
        let point = self.points.get(idx)?;
        Some(self.states.iter().cloned().zip(point.iter().copied()).collect())
    }
}

/// Enumerates the renormalized low/high corners of `bounds`.
///
/// Corner `mask` takes the upper endpoint for state `i` when bit `i` is set.
/// Fails with [`ExecError::ValidationError`] if `bounds` has more than
/// [`MAX_CORNER_STATES`] states.
pub fn extreme_distributions(bounds: &StateBounds) -> Result<ExtremeSet, ExecError> {
    let n = bounds.len();
    if n > MAX_CORNER_STATES {
        return Err(ExecError::ValidationError(format!(
            "cannot enumerate extreme distributions over {} states (limit {})",
            n, MAX_CORNER_STATES
        )));
    }

    let states: Vec<StateLabel> = bounds.keys().cloned().collect();
    let intervals: Vec<(f64, f64)> = bounds.values().map(|iv| (iv.low(), iv.high())).collect();

    let corners = 1usize << n;
    let mut points = Vec::with_capacity(corners);
    let mut degenerate = 0;
    let mut corner = vec![0.0; n];

    for mask in 0..corners {
        for (idx, (low, high)) in intervals.iter().enumerate() {
            corner[idx] = if mask & (1 << idx) != 0 { *high } else { *low };
        }
        let total: f64 = corner.iter().sum();
        if total > 0.0 {
            points.push(corner.iter().map(|v| v / total).collect());
        } else {
            degenerate += 1;
        }
    }

    Ok(ExtremeSet {
        states,
        points,
        degenerate,
    })
}

/// Number of corners [`extreme_distributions`] visits for `state_count` states,
/// saturating for counts too large to enumerate.
pub(crate) fn corner_count(state_count: usize) -> u128 {
    if state_count >= 127 {
        u128::MAX
    } else {
        1u128 << state_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::table::state_bounds;

    #[test]
    fn binary_marginal_has_four_renormalized_corners() {
        let flu = state_bounds([("Present", (0.05, 0.1)), ("Absent", (0.9, 0.95))]).unwrap();
        let set = extreme_distributions(&flu).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.degenerate(), 0);

        for point in set.points() {
            let total: f64 = point.iter().sum();
            assert!((total - 1.0).abs() < 1e-12);
        }

        // States are ordered Absent, Present. Corner 0 is (low, low) = (0.9, 0.05).
        let first = set.distribution(0).unwrap();
        assert!((first[&StateLabel::from("Absent")] - 0.9 / 0.95).abs() < 1e-12);
        assert!((first[&StateLabel::from("Present")] - 0.05 / 0.95).abs() < 1e-12);

        // Corner 3 is (high, high) = (0.95, 0.1).
        let last = set.distribution(3).unwrap();
        assert!((last[&StateLabel::from("Present")] - 0.1 / 1.05).abs() < 1e-12);
    }

    #[test]
    fn zero_sum_corners_are_dropped() {
        let bounds = state_bounds([("a", (0.0, 0.5)), ("b", (0.0, 0.5))]).unwrap();
        let set = extreme_distributions(&bounds).unwrap();
        assert_eq!(set.degenerate(), 1);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn all_zero_bounds_yield_no_corners() {
        let bounds = state_bounds([("a", (0.0, 0.0)), ("b", (0.0, 0.0))]).unwrap();
        let set = extreme_distributions(&bounds).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.degenerate(), 4);
    }

    #[test]
    fn point_bounds_produce_identical_corners() {
        let bounds = state_bounds([("a", (0.3, 0.3)), ("b", (0.7, 0.7))]).unwrap();
        let set = extreme_distributions(&bounds).unwrap();
        assert_eq!(set.len(), 4);
        for point in set.points() {
            assert!((point[0] - 0.3).abs() < 1e-12);
            assert!((point[1] - 0.7).abs() < 1e-12);
        }
    }

    #[test]
    fn three_state_marginal_has_eight_corners() {
        let bounds =
            state_bounds([("lo", (0.1, 0.2)), ("mid", (0.3, 0.5)), ("hi", (0.3, 0.6))]).unwrap();
        let set = extreme_distributions(&bounds).unwrap();
        assert_eq!(set.len(), 8);
        assert_eq!(set.states().len(), 3);
    }

    #[test]
    fn corner_count_saturates() {
        assert_eq!(corner_count(3), 8);
        assert_eq!(corner_count(500), u128::MAX);
    }
}
