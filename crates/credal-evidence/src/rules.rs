//! Dempster's rule, marginalization, belief and plausibility.

use std::collections::BTreeMap;

use crate::errors::EvidenceError;
use crate::mass::{FocalSet, MassFunction};

/// Combines two independent sources with Dempster's rule.
///
/// Products of masses whose focal sets intersect accumulate on the intersection;
/// products with an empty intersection accumulate as conflict `K`. The result is
/// renormalized by `1 - K`. Fails with [`EvidenceError::TotalConflict`] when no
/// mass survives (`K = 1`).
pub fn combine(m1: &MassFunction, m2: &MassFunction) -> Result<MassFunction, EvidenceError> {
    let mut combined: BTreeMap<FocalSet, f64> = BTreeMap::new();
    let mut conflict = 0.0;

    for (a, mass_a) in m1.iter() {
        for (b, mass_b) in m2.iter() {
            let product = mass_a * mass_b;
            let intersection = a.intersection(b);
            if intersection.is_empty() {
                conflict += product;
            } else {
                *combined.entry(intersection).or_insert(0.0) += product;
            }
        }
    }

    let normalizer = 1.0 - conflict;
    if combined.is_empty() || normalizer <= f64::EPSILON {
        return Err(EvidenceError::TotalConflict { conflict });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(conflict, focal_sets = combined.len(), "combined mass functions");

    for mass in combined.values_mut() {
        *mass /= normalizer;
    }
    Ok(MassFunction::from_masses(combined))
}

/// Projects every focal set onto `targets`, summing masses that coincide.
///
/// A focal set sharing no label with `targets` projects to the empty set, which
/// keeps its mass.
pub fn marginalize(m: &MassFunction, targets: &FocalSet) -> MassFunction {
    let mut projected: BTreeMap<FocalSet, f64> = BTreeMap::new();
    for (set, mass) in m.iter() {
        *projected.entry(set.project(targets)).or_insert(0.0) += mass;
    }
    MassFunction::from_masses(projected)
}

/// Total mass committed to subsets of `a`.
pub fn belief(m: &MassFunction, a: &FocalSet) -> f64 {
    m.iter()
        .filter(|(set, _)| set.is_subset(a))
        .map(|(_, mass)| mass)
        .sum()
}

/// Total mass not contradicting `a`.
pub fn plausibility(m: &MassFunction, a: &FocalSet) -> f64 {
    m.iter()
        .filter(|(set, _)| set.intersects(a))
        .map(|(_, mass)| mass)
        .sum()
}

/// Scales every mass of `effect` by the belief that `cause` assigns to `{label}`.
///
/// This carries evidence about a cause (e.g. a disease) over to an effect (e.g. a
/// symptom). The result is sub-normalized whenever that belief is below one.
pub fn scale_by_belief(cause: &MassFunction, effect: &MassFunction, label: &str) -> MassFunction {
    let scale = belief(cause, &FocalSet::of([label]));
    MassFunction::from_masses(
        effect
            .iter()
            .map(|(set, mass)| (set.clone(), mass * scale))
            .collect(),
    )
}
