//! Error types for evidence combination.

use thiserror::Error;

/// Errors raised by mass-function construction and combination.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvidenceError {
    /// Masses are negative, non-finite, or do not sum to one.
    #[error("invalid mass function: {0}")]
    InvalidMass(String),

    /// The two sources are in total conflict (K = 1) and cannot be combined.
    #[error("total conflict: sources share no compatible focal sets (K = {conflict})")]
    TotalConflict { conflict: f64 },
}
