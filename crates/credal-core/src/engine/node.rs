//! Credal network nodes.
//!
//! A [`CredalNode`] is one discrete random variable: its name, its ordered parent
//! list, the child links the network derives from other nodes' parent lists, and
//! its conditional credal table. Nodes refer to each other by name; the network
//! owns them.

use std::sync::Arc;

use crate::engine::errors::ExecError;
use crate::engine::table::{CredalTable, StateLabel};

/// One random variable of a credal network.
#[derive(Debug, Clone)]
pub struct CredalNode {
    name: Arc<str>,
    parents: Vec<Arc<str>>,
    children: Vec<Arc<str>>,
    table: CredalTable,
}

impl CredalNode {
    /// Creates a node with an ordered parent list and an empty table.
    ///
    /// Parent order defines the positional meaning of every table key.
    pub fn new<N, I, P>(name: N, parents: I) -> Self
    where
        N: Into<Arc<str>>,
        I: IntoIterator<Item = P>,
        P: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            children: Vec::new(),
            table: CredalTable::new(),
        }
    }

    /// Creates a node without parents.
    pub fn root<N: Into<Arc<str>>>(name: N) -> Self {
        Self::new(name, std::iter::empty::<Arc<str>>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn parents(&self) -> &[Arc<str>] {
        &self.parents
    }

    /// Nodes that list this node as a parent. Maintained by the network.
    pub fn children(&self) -> &[Arc<str>] {
        &self.children
    }

    pub fn table(&self) -> &CredalTable {
        &self.table
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// The node's own state set, discovered from its table.
    pub fn states(&self) -> Vec<StateLabel> {
        self.table.states()
    }

    pub(crate) fn add_child(&mut self, child: Arc<str>) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: &str) {
        self.children.retain(|c| c.as_ref() != child);
    }

    /// Replaces the table wholesale after validating it against this node's parents.
    ///
    /// Rejects empty tables, keys whose length differs from the parent count, and
    /// rows whose state sets disagree. Coverage of every reachable parent-state
    /// combination depends on the parents' tables and is checked by
    /// [`CredalNetwork::validate`](crate::engine::network::CredalNetwork::validate)
    /// and during propagation.
    pub fn set_credal_table(&mut self, table: CredalTable) -> Result<(), ExecError> {
        table.check_consistency(&self.name, self.parents.len())?;
        self.table = table;
        Ok(())
    }

    /// Builder form of [`set_credal_table`](Self::set_credal_table).
    pub fn with_credal_table(mut self, table: CredalTable) -> Result<Self, ExecError> {
        self.set_credal_table(table)?;
        Ok(self)
    }
}
