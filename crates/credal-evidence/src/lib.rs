//! # Credal Evidence
//!
//! Dempster-Shafer mass functions over a frame of discernment.
//!
//! A [`MassFunction`] assigns non-negative weight to sets of labels ([`FocalSet`]s)
//! with weights summing to one. The operations are pure functions:
//!
//! - [`combine`]: Dempster's rule of combination
//! - [`marginalize`]: projection onto a subset of labels
//! - [`belief`] / [`plausibility`]: lower and upper probability of a set
//! - [`scale_by_belief`]: weight an effect's masses by belief in its cause
//!
//! ```rust,ignore
//! use credal_evidence::{belief, combine, FocalSet, MassFunction};
//!
//! let flu = MassFunction::new([
//!     (FocalSet::of(["Flu"]), 0.1),
//!     (FocalSet::of(["No Flu"]), 0.8),
//!     (FocalSet::of(["Flu", "No Flu"]), 0.1),
//! ])?;
//! let combined = combine(&flu, &flu)?;
//! let bel = belief(&combined, &FocalSet::of(["Flu"]));
//! ```

#![forbid(unsafe_code)]

pub mod errors;
pub mod mass;
pub mod rules;

pub use errors::EvidenceError;
pub use mass::{FocalSet, Label, MassFunction};
pub use rules::{belief, combine, marginalize, plausibility, scale_by_belief};
