//! Focal sets and mass functions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::errors::EvidenceError;

/// Tolerance on the total mass of a normalized mass function.
pub const MASS_TOLERANCE: f64 = 1e-9;

/// A hypothesis label (an element of the frame of discernment).
pub type Label = Arc<str>;

/// A set of labels carrying mass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FocalSet(BTreeSet<Label>);

impl FocalSet {
    pub fn of<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Label>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    pub fn intersection(&self, other: &FocalSet) -> FocalSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn union(&self, other: &FocalSet) -> FocalSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn is_subset(&self, other: &FocalSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn intersects(&self, other: &FocalSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Keeps only the labels contained in `targets`.
    pub fn project(&self, targets: &FocalSet) -> FocalSet {
        self.intersection(targets)
    }
}

impl<S: Into<Label>> FromIterator<S> for FocalSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl fmt::Display for FocalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, label) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", label)?;
        }
        write!(f, "}}")
    }
}

/// Assignment of mass to focal sets.
///
/// Mass functions built with [`MassFunction::new`] are normalized: masses are
/// finite, non-negative, sum to one, and the empty set carries no mass. Results
/// of [`marginalize`](crate::rules::marginalize) may place mass on the empty set
/// (labels projected away entirely), and results of
/// [`scale_by_belief`](crate::rules::scale_by_belief) are sub-normalized; use
/// [`total`](Self::total) to inspect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassFunction {
    masses: BTreeMap<FocalSet, f64>,
}

impl MassFunction {
    /// Builds a normalized mass function. Zero masses are dropped.
    pub fn new<I>(entries: I) -> Result<Self, EvidenceError>
    where
        I: IntoIterator<Item = (FocalSet, f64)>,
    {
        let mut masses = BTreeMap::new();
        for (set, mass) in entries {
            if !mass.is_finite() || mass < 0.0 {
                return Err(EvidenceError::InvalidMass(format!(
                    "mass of {} must be finite and non-negative, got {}",
                    set, mass
                )));
            }
            if set.is_empty() && mass > 0.0 {
                return Err(EvidenceError::InvalidMass(format!(
                    "the empty set cannot carry mass, got {}",
                    mass
                )));
            }
            if masses.contains_key(&set) {
                return Err(EvidenceError::InvalidMass(format!(
                    "duplicate focal set {}",
                    set
                )));
            }
            if mass > 0.0 {
                masses.insert(set, mass);
            }
        }

        let total: f64 = masses.values().sum();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(EvidenceError::InvalidMass(format!(
                "masses must sum to 1, got {}",
                total
            )));
        }
        Ok(Self { masses })
    }

    /// All mass on the whole frame: total ignorance.
    pub fn vacuous(frame: FocalSet) -> Result<Self, EvidenceError> {
        Self::new([(frame, 1.0)])
    }

    pub(crate) fn from_masses(masses: BTreeMap<FocalSet, f64>) -> Self {
        Self { masses }
    }

    /// Mass of exactly `set` (zero if it is not focal).
    pub fn mass(&self, set: &FocalSet) -> f64 {
        self.masses.get(set).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FocalSet, f64)> {
        self.masses.iter().map(|(set, mass)| (set, *mass))
    }

    pub fn focal_sets(&self) -> impl Iterator<Item = &FocalSet> {
        self.masses.keys()
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.masses.values().sum()
    }

    /// Union of all focal sets.
    pub fn frame(&self) -> FocalSet {
        self.masses
            .keys()
            .fold(FocalSet::empty(), |acc, set| acc.union(set))
    }
}

impl fmt::Display for MassFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, mass) in &self.masses {
            writeln!(f, "{}: {:.3}", set, mass)?;
        }
        Ok(())
    }
}
