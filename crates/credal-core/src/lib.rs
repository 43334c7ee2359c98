//! # Credal Core
//!
//! Interval-valued ("credal") probability propagation over discrete directed
//! acyclic graphs. Every conditional probability is an interval `[low, high]`;
//! propagation derives, for every node and state, lower and upper bounds on the
//! node's marginal probability.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use credal_core::{CredalNetwork, CredalNode, CredalTable};
//!
//! let flu = CredalNode::root("Flu").with_credal_table(CredalTable::root([
//!     ("Present", (0.05, 0.1)),
//!     ("Absent", (0.9, 0.95)),
//! ])?)?;
//! let fever = CredalNode::new("Fever", ["Flu"]).with_credal_table(
//!     CredalTable::new()
//!         .with_row(["Present"], [("Present", (0.8, 0.95)), ("Absent", (0.05, 0.2))])?
//!         .with_row(["Absent"], [("Present", (0.0, 0.1)), ("Absent", (0.9, 1.0))])?,
//! )?;
//!
//! let mut network = CredalNetwork::new();
//! network.add_node(flu);
//! network.add_node(fever);
//! let marginals = network.propagate()?;
//! ```
//!
//! ## Features
//!
//! - `serde`: JSON network descriptions and serializable results
//! - `tracing`: structured debug events and [`engine::observer::TracingObserver`]
//! - `parallel`: layer-parallel propagation with rayon

#![forbid(unsafe_code)]

pub mod engine;

// Re-export commonly used types
pub use engine::errors::ExecError;
pub use engine::interval::Interval;
pub use engine::network::CredalNetwork;
pub use engine::node::CredalNode;
pub use engine::observer::{NoopObserver, PropagationObserver, RecordingObserver};
pub use engine::propagation::{
    Aggregation, Marginals, PropagationConfig, PropagationDiagnostics,
};
pub use engine::table::{CredalTable, ParentAssignment, StateBounds, StateLabel};

#[cfg(feature = "serde")]
pub use engine::description::NetworkDescription;

/// Parses a JSON network description, builds the network and validates it.
#[cfg(feature = "serde")]
pub fn load_network(source: &str) -> Result<CredalNetwork, ExecError> {
    let network = NetworkDescription::from_json(source)?.into_network()?;
    network.validate()?;
    Ok(network)
}
