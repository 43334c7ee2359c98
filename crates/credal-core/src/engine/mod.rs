//! The propagation engine for credal networks.
//!
//! This module provides:
//! - **errors**: Error types for construction, validation and propagation failures
//! - **interval**: Probability intervals `[low, high]`
//! - **table**: Conditional credal tables and their composite parent-assignment keys
//! - **node**: Network nodes (name, ordered parents, derived children, table)
//! - **network**: Node registry, edge wiring, validation and topological layering
//! - **extreme**: Low/high corner enumeration of interval marginals
//! - **propagation**: Extreme-point marginal propagation with per-call memoization
//! - **observer**: Event hooks for tracing intermediate results
//! - **parallel**: Layer-parallel propagation (`parallel` feature)
//! - **description**: Serializable network descriptions (`serde` feature)

#[cfg(feature = "serde")]
pub mod description;
pub mod errors;
pub mod extreme;
pub mod interval;
pub mod network;
pub mod node;
pub mod observer;
pub mod parallel;
pub mod propagation;
pub mod table;
