//! # Credal Network
//!
//! The network owns every [`CredalNode`] keyed by name and derives the child
//! links from the nodes' parent lists. Propagation entry points live in
//! [`propagation`](crate::engine::propagation) and operate on a shared
//! `&CredalNetwork`, so a network can be propagated any number of times.
//!
//! ## Registration order
//!
//! Parents are referenced by name, so a node may be registered before or after
//! its parents. [`CredalNetwork::add_node`] wires links in both directions: the
//! new node becomes a child of every registered parent, and it adopts every
//! registered node that already names it as a parent.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::errors::ExecError;
use crate::engine::node::CredalNode;
use crate::engine::table::{AssignmentDisplay, CredalTable, StateLabel};

/// A directed acyclic network of credal nodes.
#[derive(Debug, Clone, Default)]
pub struct CredalNetwork {
    nodes: FxHashMap<Arc<str>, CredalNode>,
}

impl CredalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node under its name and wires parent→child links.
    ///
    /// If a node with the same name exists it is replaced (last write wins) and
    /// returned; child links that only the replaced node justified are dropped.
    pub fn add_node(&mut self, mut node: CredalNode) -> Option<CredalNode> {
        let name = node.name_arc();

        let mut adopted: Vec<Arc<str>> = self
            .nodes
            .values()
            .filter(|other| other.parents().contains(&name))
            .map(CredalNode::name_arc)
            .collect();
        adopted.sort_unstable();
        for child in adopted {
            node.add_child(child);
        }

        for (other_name, other) in self.nodes.iter_mut() {
            if node.parents().contains(other_name) {
                other.add_child(name.clone());
            } else {
                other.remove_child(&name);
            }
        }
        if node.parents().contains(&name) {
            node.add_child(name.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            node = %name,
            parents = node.parents().len(),
            children = node.children().len(),
            "registered credal node"
        );

        let replaced = self.nodes.insert(name, node);

        #[cfg(feature = "tracing")]
        if let Some(old) = &replaced {
            tracing::warn!(node = %old.name(), "replaced existing node with the same name");
        }

        replaced
    }

    pub fn node(&self, name: &str) -> Option<&CredalNode> {
        self.nodes.get(name)
    }

    /// Replaces the table of a registered node, leaving its name and edges intact.
    ///
    /// The next propagation call sees the new table; nothing is cached across calls.
    pub fn set_credal_table(&mut self, name: &str, table: CredalTable) -> Result<(), ExecError> {
        let node = self
            .nodes
            .get_mut(name)
            .ok_or_else(|| ExecError::UnknownNode(name.to_string()))?;
        node.set_credal_table(table)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(node = %name, rows = node.table().len(), "replaced credal table");

        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in name order.
    pub fn nodes(&self) -> Vec<&CredalNode> {
        let mut nodes: Vec<&CredalNode> = self.nodes.values().collect();
        nodes.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        nodes
    }

    /// Node names in name order.
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.nodes.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Groups nodes into layers such that every node's parents sit in earlier layers.
    ///
    /// Layer members are sorted by name. Fails with [`ExecError::UnknownNode`] for a
    /// dangling parent reference and [`ExecError::Cycle`] if the graph is cyclic.
    pub fn topological_layers(&self) -> Result<Vec<Vec<Arc<str>>>, ExecError> {
        let mut pending: BTreeMap<Arc<str>, usize> = BTreeMap::new();
        for (name, node) in &self.nodes {
            for parent in node.parents() {
                if !self.nodes.contains_key(parent) {
                    return Err(ExecError::UnknownNode(format!(
                        "{} (parent of '{}')",
                        parent, name
                    )));
                }
            }
            let distinct: FxHashSet<&Arc<str>> = node.parents().iter().collect();
            pending.insert(name.clone(), distinct.len());
        }

        let mut layers = Vec::new();
        let mut frontier: Vec<Arc<str>> = pending
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(name, _)| name.clone())
            .collect();

        while !frontier.is_empty() {
            for name in &frontier {
                pending.remove(name);
            }
            let mut next = Vec::new();
            for name in &frontier {
                let Some(node) = self.nodes.get(name) else {
                    continue;
                };
                for child in node.children() {
                    if let Some(count) = pending.get_mut(child) {
                        *count = count.saturating_sub(1);
                        if *count == 0 {
                            next.push(child.clone());
                        }
                    }
                }
            }
            next.sort_unstable();
            next.dedup();
            layers.push(std::mem::replace(&mut frontier, next));
        }

        if let Some(name) = pending.keys().next() {
            return Err(ExecError::Cycle(name.to_string()));
        }
        Ok(layers)
    }

    /// Eagerly checks the whole network before propagation.
    ///
    /// - every parent reference resolves and the graph is acyclic;
    /// - every node has a table consistent with its parent count;
    /// - every non-root table covers the full cross product of its parents' state
    ///   sets, and contains no row naming a state its parent does not have.
    pub fn validate(&self) -> Result<(), ExecError> {
        self.topological_layers()?;

        for node in self.nodes() {
            node.table()
                .check_consistency(node.name(), node.parents().len())?;
            if node.is_root() {
                continue;
            }

            let parent_states: Vec<Vec<StateLabel>> = node
                .parents()
                .iter()
                .map(|parent| {
                    self.nodes
                        .get(parent)
                        .map(CredalNode::states)
                        .ok_or_else(|| ExecError::UnknownNode(parent.to_string()))
                })
                .collect::<Result<_, _>>()?;

            for (key, _) in node.table().rows() {
                for (position, state) in key.states().iter().enumerate() {
                    if !parent_states[position].contains(state) {
                        return Err(ExecError::ValidationError(format!(
                            "node '{}': row {} names state '{}' unknown to parent '{}'",
                            node.name(),
                            key,
                            state,
                            node.parents()[position]
                        )));
                    }
                }
            }

            check_coverage(node, &parent_states)?;
        }
        Ok(())
    }
}

/// Fails with [`ExecError::MissingEntry`] on the first uncovered parent assignment.
pub(crate) fn check_coverage(
    node: &CredalNode,
    parent_states: &[Vec<StateLabel>],
) -> Result<(), ExecError> {
    if parent_states.iter().any(Vec::is_empty) {
        return Ok(());
    }
    let radices: Vec<usize> = parent_states.iter().map(Vec::len).collect();
    let mut counters = vec![0usize; radices.len()];
    let mut key: Vec<StateLabel> = parent_states.iter().map(|s| s[0].clone()).collect();
    loop {
        for (slot, (states, &idx)) in key.iter_mut().zip(parent_states.iter().zip(&counters)) {
            *slot = states[idx].clone();
        }
        if node.table().row(&key).is_none() {
            return Err(ExecError::missing_entry(
                node.name(),
                AssignmentDisplay(&key),
            ));
        }
        if !advance(&mut counters, &radices) {
            return Ok(());
        }
    }
}

/// Mixed-radix increment; returns `false` once every combination has been visited.
pub(crate) fn advance(counters: &mut [usize], radices: &[usize]) -> bool {
    for (counter, &radix) in counters.iter_mut().zip(radices).rev() {
        *counter += 1;
        if *counter < radix {
            return true;
        }
        *counter = 0;
    }
    false
}
