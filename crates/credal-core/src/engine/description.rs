//! Serializable network descriptions.
//!
//! A [`NetworkDescription`] is the on-disk form of a credal network: a list of
//! nodes, each with its ordered parents and table rows. Bounds are written as
//! two-element arrays `[low, high]`.
//!
//! ```json
//! {
//!   "nodes": [
//!     { "name": "Flu", "table": [ { "bounds": { "Present": [0.05, 0.1], "Absent": [0.9, 0.95] } } ] },
//!     { "name": "Fever", "parents": ["Flu"], "table": [
//!         { "given": ["Present"], "bounds": { "Present": [0.8, 0.95], "Absent": [0.05, 0.2] } },
//!         { "given": ["Absent"],  "bounds": { "Present": [0.0, 0.1],  "Absent": [0.9, 1.0] } }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::errors::ExecError;
use crate::engine::interval::Interval;
use crate::engine::network::CredalNetwork;
use crate::engine::node::CredalNode;
use crate::engine::table::{CredalTable, ParentAssignment, StateBounds};

/// A whole network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub nodes: Vec<NodeDescription>,
}

/// One node with its table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    pub table: Vec<RowDescription>,
}

/// One table row: parent states (in parent order) and per-state bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDescription {
    #[serde(default)]
    pub given: Vec<String>,
    pub bounds: BTreeMap<String, Interval>,
}

impl NetworkDescription {
    pub fn from_json(source: &str) -> Result<Self, ExecError> {
        serde_json::from_str(source).map_err(|err| ExecError::ParseError(err.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ExecError> {
        serde_json::to_string_pretty(self).map_err(|err| ExecError::Internal(err.to_string()))
    }

    /// Describes an existing network, nodes and rows in sorted order.
    pub fn from_network(network: &CredalNetwork) -> Self {
        let nodes = network
            .nodes()
            .into_iter()
            .map(|node| {
                let mut rows: Vec<(&ParentAssignment, &StateBounds)> = node.table().rows().collect();
                rows.sort_unstable_by(|a, b| a.0.cmp(b.0));
                NodeDescription {
                    name: node.name().to_string(),
                    parents: node.parents().iter().map(|p| p.to_string()).collect(),
                    table: rows
                        .into_iter()
                        .map(|(key, bounds)| RowDescription {
                            given: key.states().iter().map(|s| s.to_string()).collect(),
                            bounds: bounds
                                .iter()
                                .map(|(state, interval)| (state.to_string(), *interval))
                                .collect(),
                        })
                        .collect(),
                }
            })
            .collect();
        Self { nodes }
    }

    /// Builds and registers every node. Each table is validated as it is attached.
    pub fn into_network(self) -> Result<CredalNetwork, ExecError> {
        let mut network = CredalNetwork::new();
        for node in self.nodes {
            if network.contains(&node.name) {
                return Err(ExecError::ValidationError(format!(
                    "duplicate node '{}' in description",
                    node.name
                )));
            }
            let mut table = CredalTable::new();
            for row in node.table {
                let key = ParentAssignment::new(row.given);
                let bounds: StateBounds = row
                    .bounds
                    .into_iter()
                    .map(|(state, interval)| (state.into(), interval))
                    .collect();
                if table.insert_row(key.clone(), bounds).is_some() {
                    return Err(ExecError::ValidationError(format!(
                        "node '{}': duplicate row {}",
                        node.name, key
                    )));
                }
            }
            let credal_node = CredalNode::new(node.name, node.parents).with_credal_table(table)?;
            network.add_node(credal_node);
        }
        Ok(network)
    }
}
