//! Conditional credal tables.
//!
//! A [`CredalTable`] maps each assignment of a node's parents to one interval per
//! state of the node itself. Parent assignments are modelled by the explicit
//! composite key [`ParentAssignment`]: an ordered list of parent-state labels whose
//! positions match the node's parent list.
//!
//! ## Key contract
//!
//! `ParentAssignment` hashes and compares exactly like the slice of labels it
//! wraps, so tables can be probed with a borrowed `&[StateLabel]` buffer during
//! enumeration without allocating a key per lookup.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::errors::ExecError;
use crate::engine::interval::Interval;

/// A state label of a node (e.g. `"Present"`).
pub type StateLabel = Arc<str>;

/// One interval per state, ordered by state label.
pub type StateBounds = BTreeMap<StateLabel, Interval>;

/// Ordered parent-state labels used as a table key.
///
/// The empty assignment keys the single row of a root node's table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParentAssignment(SmallVec<[StateLabel; 4]>);

impl ParentAssignment {
    /// The empty assignment used by root nodes.
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateLabel>,
    {
        Self(states.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn states(&self) -> &[StateLabel] {
        &self.0
    }
}

impl Borrow<[StateLabel]> for ParentAssignment {
    fn borrow(&self) -> &[StateLabel] {
        &self.0
    }
}

impl<S: Into<StateLabel>> FromIterator<S> for ParentAssignment {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for ParentAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_assignment(f, &self.0)
    }
}

/// Formats a parent-state slice as `(a, b)`.
pub(crate) struct AssignmentDisplay<'a>(pub &'a [StateLabel]);

impl fmt::Display for AssignmentDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_assignment(f, self.0)
    }
}

fn fmt_assignment(f: &mut fmt::Formatter<'_>, states: &[StateLabel]) -> fmt::Result {
    write!(f, "(")?;
    for (idx, state) in states.iter().enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", state)?;
    }
    write!(f, ")")
}

/// Builds a [`StateBounds`] map from `(state, (low, high))` pairs.
///
/// Duplicate state labels are rejected rather than silently overwritten.
pub fn state_bounds<I, S>(entries: I) -> Result<StateBounds, ExecError>
where
    I: IntoIterator<Item = (S, (f64, f64))>,
    S: Into<StateLabel>,
{
    let mut bounds = StateBounds::new();
    for (state, (low, high)) in entries {
        let state: StateLabel = state.into();
        let interval = Interval::new(low, high).map_err(|err| {
            ExecError::ValidationError(format!("state '{}': {}", state, err))
        })?;
        if bounds.insert(state.clone(), interval).is_some() {
            return Err(ExecError::ValidationError(format!(
                "duplicate state '{}' in bounds",
                state
            )));
        }
    }
    Ok(bounds)
}

/// Conditional credal table: parent assignment → per-state probability intervals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredalTable {
    rows: FxHashMap<ParentAssignment, StateBounds>,
}

impl CredalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A root table: a single row keyed by the empty assignment.
    ///
    /// ```rust,ignore
    /// let flu = CredalTable::root([("Present", (0.05, 0.1)), ("Absent", (0.9, 0.95))])?;
    /// ```
    pub fn root<I, S>(entries: I) -> Result<Self, ExecError>
    where
        I: IntoIterator<Item = (S, (f64, f64))>,
        S: Into<StateLabel>,
    {
        Self::new().with_row(std::iter::empty::<StateLabel>(), entries)
    }

    /// Adds a row keyed by `given` (parent states in parent order).
    pub fn with_row<G, P, I, S>(mut self, given: G, entries: I) -> Result<Self, ExecError>
    where
        G: IntoIterator<Item = P>,
        P: Into<StateLabel>,
        I: IntoIterator<Item = (S, (f64, f64))>,
        S: Into<StateLabel>,
    {
        let key = ParentAssignment::new(given);
        let bounds = state_bounds(entries)?;
        if self.rows.contains_key(&key) {
            return Err(ExecError::ValidationError(format!(
                "duplicate row for parent assignment {}",
                key
            )));
        }
        self.rows.insert(key, bounds);
        Ok(self)
    }

    /// Inserts or replaces a row, returning the previous one.
    pub fn insert_row(
        &mut self,
        assignment: ParentAssignment,
        bounds: StateBounds,
    ) -> Option<StateBounds> {
        self.rows.insert(assignment, bounds)
    }

    /// Looks up the row for a parent assignment.
    pub fn row(&self, assignment: &[StateLabel]) -> Option<&StateBounds> {
        self.rows.get(assignment)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ParentAssignment, &StateBounds)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The node's state set, taken from any row (all rows agree once validated).
    pub fn states(&self) -> Vec<StateLabel> {
        self.rows
            .values()
            .next()
            .map(|bounds| bounds.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Key length shared by all rows, or `None` for an empty table.
    pub fn arity(&self) -> Option<usize> {
        self.rows.keys().next().map(ParentAssignment::len)
    }

    /// Checks the structural invariants that do not depend on other nodes.
    ///
    /// - the table has at least one row and every row has at least one state;
    /// - every key has exactly `arity` labels;
    /// - every row carries the same state set.
    pub fn check_consistency(&self, node: &str, arity: usize) -> Result<(), ExecError> {
        let mut keys: Vec<&ParentAssignment> = self.rows.keys().collect();
        keys.sort_unstable();

        let first = keys.first().ok_or_else(|| {
            ExecError::ValidationError(format!("node '{}': credal table is empty", node))
        })?;
        let expected: BTreeSet<&StateLabel> = self.rows[*first].keys().collect();
        if expected.is_empty() {
            return Err(ExecError::ValidationError(format!(
                "node '{}': row {} has no states",
                node, first
            )));
        }

        for key in keys {
            if key.len() != arity {
                return Err(ExecError::ValidationError(format!(
                    "node '{}': row {} has {} parent states, expected {}",
                    node,
                    key,
                    key.len(),
                    arity
                )));
            }
            let states: BTreeSet<&StateLabel> = self.rows[key].keys().collect();
            if states != expected {
                return Err(ExecError::ValidationError(format!(
                    "node '{}': row {} has states {{{}}}, expected {{{}}}",
                    node,
                    key,
                    join_labels(states.iter().copied()),
                    join_labels(expected.iter().copied())
                )));
            }
        }
        Ok(())
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a StateLabel>) -> String {
    labels.map(|s| s.as_ref()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(states: &[&str]) -> Vec<StateLabel> {
        states.iter().map(|s| StateLabel::from(*s)).collect()
    }

    #[test]
    fn root_table_has_single_empty_key() {
        let table = CredalTable::root([("Present", (0.05, 0.1)), ("Absent", (0.9, 0.95))]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.arity(), Some(0));
        let row = table.row(&[]).expect("root row");
        assert_eq!(row.len(), 2);
        assert_eq!(table.states(), labels(&["Absent", "Present"]));
    }

    #[test]
    fn row_lookup_by_borrowed_slice() {
        let table = CredalTable::new()
            .with_row(["Present"], [("Yes", (0.7, 0.9)), ("No", (0.1, 0.3))])
            .unwrap()
            .with_row(["Absent"], [("Yes", (0.0, 0.2)), ("No", (0.8, 1.0))])
            .unwrap();
        let key = labels(&["Absent"]);
        let row = table.row(&key).expect("row present");
        assert_eq!(row[&StateLabel::from("No")].low(), 0.8);
        assert!(table.row(&labels(&["Unknown"])).is_none());
    }

    #[test]
    fn duplicate_rows_and_states_are_rejected() {
        let dup_row = CredalTable::new()
            .with_row(["a"], [("x", (0.1, 0.2))])
            .unwrap()
            .with_row(["a"], [("x", (0.3, 0.4))]);
        assert!(dup_row.is_err());

        let dup_state = state_bounds([("x", (0.1, 0.2)), ("x", (0.2, 0.3))]);
        assert!(dup_state.is_err());
    }

    #[test]
    fn invalid_interval_names_the_state() {
        let err = state_bounds([("Present", (0.5, 0.2))]).unwrap_err();
        assert!(err.to_string().contains("Present"));
    }

    #[test]
    fn consistency_detects_state_mismatch() {
        let table = CredalTable::new()
            .with_row(["a"], [("x", (0.1, 0.2)), ("y", (0.8, 0.9))])
            .unwrap()
            .with_row(["b"], [("x", (0.1, 0.2)), ("z", (0.8, 0.9))])
            .unwrap();
        let err = table.check_consistency("N", 1).unwrap_err();
        assert!(matches!(err, ExecError::ValidationError(_)));
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn consistency_detects_wrong_arity() {
        let table = CredalTable::new()
            .with_row(["a", "b"], [("x", (0.1, 0.2))])
            .unwrap();
        assert!(table.check_consistency("N", 1).is_err());
        assert!(table.check_consistency("N", 2).is_ok());
    }

    #[test]
    fn consistency_rejects_empty_table() {
        assert!(CredalTable::new().check_consistency("N", 0).is_err());
    }

    #[test]
    fn assignment_display_lists_states() {
        let key = ParentAssignment::new(["Present", "Absent"]);
        assert_eq!(key.to_string(), "(Present, Absent)");
        assert_eq!(ParentAssignment::root().to_string(), "()");
    }

    #[test]
    fn assignment_equality_is_positional() {
        let ab = ParentAssignment::new(["a", "b"]);
        let ba = ParentAssignment::new(["b", "a"]);
        assert_ne!(ab, ba);
        assert_eq!(ab, ["a", "b"].into_iter().collect::<ParentAssignment>());
    }
}
