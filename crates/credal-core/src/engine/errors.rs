//! Error types for credal network construction and propagation.

use thiserror::Error;

/// Errors that can occur while building, validating, or propagating a credal network.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// Every variant is local to a single node's table or to the graph structure.
/// None of them are transient: a failing propagation call should be fixed at the
/// model level rather than retried.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    /// Malformed network description (e.g., invalid JSON).
    #[error("parse error: {0}")]
    ParseError(String),

    /// Malformed table or interval (state-set mismatch, wrong key arity, bounds outside [0, 1]).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A parent-state combination required by enumeration is absent from a node's table.
    #[error("missing credal table entry for node '{node}' at parent assignment {assignment}")]
    MissingEntry { node: String, assignment: String },

    /// A node references a parent that is not registered with the network.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// The parent graph contains a cycle through the named node.
    #[error("cycle detected through node '{0}'")]
    Cycle(String),

    /// Enumerating a node's extreme combinations would exceed the configured limit.
    #[error(
        "enumeration limit exceeded for node '{node}': {required} evaluations required, limit is {limit}"
    )]
    EnumerationLimit {
        node: String,
        required: u128,
        limit: usize,
    },

    /// Numerical stability error (NaN/Inf in computed bounds).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Internal execution error (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExecError {
    pub(crate) fn missing_entry(node: &str, assignment: impl std::fmt::Display) -> Self {
        Self::MissingEntry {
            node: node.to_string(),
            assignment: assignment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_message_names_node_and_assignment() {
        let err = ExecError::missing_entry("Fever", "(Absent, Absent)");
        assert_eq!(
            err.to_string(),
            "missing credal table entry for node 'Fever' at parent assignment (Absent, Absent)"
        );
    }

    #[test]
    fn enumeration_limit_message_reports_sizes() {
        let err = ExecError::EnumerationLimit {
            node: "X".into(),
            required: 1024,
            limit: 16,
        };
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("16"));
    }
}
