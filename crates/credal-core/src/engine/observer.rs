//! Observation hooks for propagation.
//!
//! The propagation algorithm never prints. Callers that want a trace of
//! intermediate results pass a [`PropagationObserver`]; every method has a no-op
//! default so implementors only override what they need.

use crate::engine::extreme::ExtremeSet;
use crate::engine::table::{StateBounds, StateLabel};

/// Receives events from a propagation pass.
pub trait PropagationObserver {
    /// A node's marginal is about to be computed (not called on cache hits).
    fn on_node_start(&mut self, _node: &str) {}

    /// A previously computed marginal was reused.
    fn on_cache_hit(&mut self, _node: &str) {}

    /// A root node returned its own table row.
    fn on_root(&mut self, _node: &str, _bounds: &StateBounds) {}

    /// The extreme distributions of one parent of `node` were enumerated.
    fn on_extremes(&mut self, _node: &str, _parent: &str, _extremes: &ExtremeSet) {}

    /// One joint parent assignment was evaluated with the given joint probability.
    fn on_assignment(&mut self, _node: &str, _assignment: &[StateLabel], _probability: f64) {}

    /// A node's final marginal bounds are known.
    fn on_node_complete(&mut self, _node: &str, _bounds: &StateBounds) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PropagationObserver for NoopObserver {}

/// A recorded propagation event.
#[derive(Debug, Clone, PartialEq)]
pub enum PropagationEvent {
    NodeStart(String),
    CacheHit(String),
    Root(String),
    Extremes {
        node: String,
        parent: String,
        count: usize,
        degenerate: usize,
    },
    Assignment {
        node: String,
        assignment: Vec<String>,
        probability: f64,
    },
    NodeComplete(String, StateBounds),
}

/// Observer that keeps every event in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Vec<PropagationEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of nodes whose marginal was computed, in completion order.
    pub fn completed(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PropagationEvent::NodeComplete(name, _) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PropagationObserver for RecordingObserver {
    fn on_node_start(&mut self, node: &str) {
        self.events.push(PropagationEvent::NodeStart(node.to_string()));
    }

    fn on_cache_hit(&mut self, node: &str) {
        self.events.push(PropagationEvent::CacheHit(node.to_string()));
    }

    fn on_root(&mut self, node: &str, _bounds: &StateBounds) {
        self.events.push(PropagationEvent::Root(node.to_string()));
    }

    fn on_extremes(&mut self, node: &str, parent: &str, extremes: &ExtremeSet) {
        self.events.push(PropagationEvent::Extremes {
            node: node.to_string(),
            parent: parent.to_string(),
            count: extremes.len(),
            degenerate: extremes.degenerate(),
        });
    }

    fn on_assignment(&mut self, node: &str, assignment: &[StateLabel], probability: f64) {
        self.events.push(PropagationEvent::Assignment {
            node: node.to_string(),
            assignment: assignment.iter().map(|s| s.to_string()).collect(),
            probability,
        });
    }

    fn on_node_complete(&mut self, node: &str, bounds: &StateBounds) {
        self.events
            .push(PropagationEvent::NodeComplete(node.to_string(), bounds.clone()));
    }
}

/// Observer that forwards events to `tracing`.
///
/// Node-level events are emitted at `debug`, per-assignment events at `trace`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl PropagationObserver for TracingObserver {
    fn on_node_start(&mut self, node: &str) {
        tracing::debug!(node, "computing marginal");
    }

    fn on_cache_hit(&mut self, node: &str) {
        tracing::trace!(node, "reusing cached marginal");
    }

    fn on_root(&mut self, node: &str, bounds: &StateBounds) {
        for (state, interval) in bounds {
            tracing::debug!(node, state = %state, bounds = %interval, "root prior");
        }
    }

    fn on_extremes(&mut self, node: &str, parent: &str, extremes: &ExtremeSet) {
        tracing::debug!(
            node,
            parent,
            count = extremes.len(),
            degenerate = extremes.degenerate(),
            "parent extreme points"
        );
        for idx in 0..extremes.len() {
            if let Some(distribution) = extremes.distribution(idx) {
                tracing::trace!(node, parent, ?distribution, "extreme point");
            }
        }
    }

    fn on_assignment(&mut self, node: &str, assignment: &[StateLabel], probability: f64) {
        tracing::trace!(node, ?assignment, probability, "parent assignment");
    }

    fn on_node_complete(&mut self, node: &str, bounds: &StateBounds) {
        for (state, interval) in bounds {
            tracing::debug!(node, state = %state, bounds = %interval, "final marginal");
        }
    }
}
