//! Extreme-point marginal propagation.
//!
//! Computes interval marginals for every node of a [`CredalNetwork`]. Each node is
//! resolved by first resolving its parents (recursively, memoized per call), then
//! combining the parents' extreme distributions with the node's own table.
//!
//! ## Algorithm
//!
//! For a node with parents `p_1 .. p_k`:
//!
//! 1. Enumerate the renormalized low/high corners of every parent marginal
//!    (see [`extreme_distributions`]).
//! 2. For every combination of one corner per parent, and every joint parent
//!    assignment, the joint probability is the product of each chosen corner's
//!    weight at the assigned state.
//! 3. The table row for that assignment is scaled by the joint probability.
//! 4. Per node state, the lower bound is the minimum and the upper bound the
//!    maximum of the scaled endpoints over everything enumerated.
//!
//! Step 4 aggregates pointwise over joint assignments ([`Aggregation::Pointwise`]),
//! which is the established behaviour of this engine. [`Aggregation::TotalProbability`]
//! instead sums the scaled rows over joint assignments for each corner combination
//! before taking the minimum and maximum; with point-valued tables it reduces to
//! ordinary forward propagation.
//!
//! The memo cache lives only for the duration of one call.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::errors::ExecError;
use crate::engine::extreme::{corner_count, extreme_distributions, ExtremeSet};
use crate::engine::interval::Interval;
use crate::engine::network::{advance, check_coverage, CredalNetwork};
use crate::engine::node::CredalNode;
use crate::engine::observer::{NoopObserver, PropagationObserver};
use crate::engine::table::{AssignmentDisplay, StateBounds, StateLabel};

/// Marginal bounds for every node, keyed by node name.
pub type Marginals = BTreeMap<Arc<str>, StateBounds>;

/// How scaled table rows are folded into a node's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Aggregation {
    /// Min/max over every (corner combination, joint assignment) pair.
    #[default]
    Pointwise,
    /// Min/max over corner combinations of the probability-weighted row sum.
    TotalProbability,
}

/// Configuration for extreme-point propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationConfig {
    /// How scaled rows are aggregated into bounds.
    pub aggregation: Aggregation,
    /// Upper limit on (corner combination × joint assignment) pairs for one node.
    pub max_enumeration: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::Pointwise,
            max_enumeration: 1 << 24,
        }
    }
}

impl PropagationConfig {
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub(crate) fn validate(self) -> Result<Self, ExecError> {
        if self.max_enumeration == 0 {
            return Err(ExecError::ValidationError(
                "propagate: max_enumeration must be > 0".into(),
            ));
        }
        Ok(self)
    }
}

/// Counters describing one propagation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropagationDiagnostics {
    /// Marginals actually computed (each node at most once per call).
    pub nodes_computed: usize,
    /// Requests answered from the memo cache.
    pub cache_hits: usize,
    /// Usable parent corners enumerated.
    pub extreme_points: usize,
    /// Parent corners dropped because they summed to zero.
    pub degenerate_extremes: usize,
    /// (corner combination, joint assignment) pairs evaluated.
    pub assignments_evaluated: usize,
    /// Node states that were never touched and fell back to `[0, 1]`.
    pub fallback_states: usize,
}

impl PropagationDiagnostics {
    pub(crate) fn merge(&mut self, other: &PropagationDiagnostics) {
        self.nodes_computed += other.nodes_computed;
        self.cache_hits += other.cache_hits;
        self.extreme_points += other.extreme_points;
        self.degenerate_extremes += other.degenerate_extremes;
        self.assignments_evaluated += other.assignments_evaluated;
        self.fallback_states += other.fallback_states;
    }
}

impl CredalNetwork {
    /// Computes marginal bounds for every node with the default configuration.
    pub fn propagate(&self) -> Result<Marginals, ExecError> {
        self.propagate_with_config(PropagationConfig::default())
    }

    /// Computes marginal bounds for every node with an explicit configuration.
    pub fn propagate_with_config(&self, config: PropagationConfig) -> Result<Marginals, ExecError> {
        self.propagate_with_config_diagnostics(config)
            .map(|(marginals, _)| marginals)
    }

    /// Computes marginal bounds for every node with the default configuration and diagnostics.
    pub fn propagate_with_diagnostics(
        &self,
    ) -> Result<(Marginals, PropagationDiagnostics), ExecError> {
        self.propagate_with_config_diagnostics(PropagationConfig::default())
    }

    /// Computes marginal bounds for every node with an explicit configuration and diagnostics.
    pub fn propagate_with_config_diagnostics(
        &self,
        config: PropagationConfig,
    ) -> Result<(Marginals, PropagationDiagnostics), ExecError> {
        self.propagate_observed(config, &mut NoopObserver)
    }

    /// Computes marginal bounds for every node, reporting progress to `observer`.
    pub fn propagate_observed<O>(
        &self,
        config: PropagationConfig,
        observer: &mut O,
    ) -> Result<(Marginals, PropagationDiagnostics), ExecError>
    where
        O: PropagationObserver + ?Sized,
    {
        let config = config.validate()?;
        let mut pass = Propagator::new(self, config, observer);
        let mut marginals = Marginals::new();
        for name in self.names() {
            let bounds = pass.marginal(&name)?;
            marginals.insert(name, bounds);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = pass.diagnostics.nodes_computed,
            cache_hits = pass.diagnostics.cache_hits,
            assignments = pass.diagnostics.assignments_evaluated,
            "propagation complete"
        );

        Ok((marginals, pass.diagnostics))
    }

    /// Computes the marginal bounds of a single node (and, transitively, its ancestors).
    pub fn compute_marginal(&self, name: &str) -> Result<StateBounds, ExecError> {
        self.compute_marginal_with_config(name, PropagationConfig::default())
    }

    pub fn compute_marginal_with_config(
        &self,
        name: &str,
        config: PropagationConfig,
    ) -> Result<StateBounds, ExecError> {
        let config = config.validate()?;
        let mut observer = NoopObserver;
        Propagator::new(self, config, &mut observer).marginal(name)
    }
}

/// State of one propagation call: memo cache, recursion guard and counters.
struct Propagator<'a, O: PropagationObserver + ?Sized> {
    network: &'a CredalNetwork,
    config: PropagationConfig,
    cache: FxHashMap<Arc<str>, StateBounds>,
    in_progress: FxHashSet<Arc<str>>,
    diagnostics: PropagationDiagnostics,
    observer: &'a mut O,
}

impl<'a, O: PropagationObserver + ?Sized> Propagator<'a, O> {
    fn new(network: &'a CredalNetwork, config: PropagationConfig, observer: &'a mut O) -> Self {
        Self {
            network,
            config,
            cache: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            diagnostics: PropagationDiagnostics::default(),
            observer,
        }
    }

    fn marginal(&mut self, name: &str) -> Result<StateBounds, ExecError> {
        if let Some(cached) = self.cache.get(name) {
            self.diagnostics.cache_hits += 1;
            self.observer.on_cache_hit(name);
            return Ok(cached.clone());
        }

        let network = self.network;
        let node = network
            .node(name)
            .ok_or_else(|| ExecError::UnknownNode(name.to_string()))?;
        let key = node.name_arc();
        if !self.in_progress.insert(key.clone()) {
            return Err(ExecError::Cycle(name.to_string()));
        }
        let result = self.compute(node);
        self.in_progress.remove(&key);

        let bounds = result?;
        self.cache.insert(key, bounds.clone());
        Ok(bounds)
    }

    fn compute(&mut self, node: &CredalNode) -> Result<StateBounds, ExecError> {
        self.observer.on_node_start(node.name());
        self.diagnostics.nodes_computed += 1;

        if node.is_root() {
            let bounds = root_marginal(node)?;
            self.observer.on_root(node.name(), &bounds);
            self.observer.on_node_complete(node.name(), &bounds);
            return Ok(bounds);
        }

        let mut parent_marginals = Vec::with_capacity(node.parents().len());
        for parent in node.parents() {
            parent_marginals.push(self.marginal(parent)?);
        }

        let bounds = marginal_from_parents(
            node,
            &parent_marginals,
            &self.config,
            &mut self.diagnostics,
            &mut *self.observer,
        )?;
        self.observer.on_node_complete(node.name(), &bounds);
        Ok(bounds)
    }
}

/// A root node's marginal: its own table row keyed by the empty assignment.
pub fn root_marginal(node: &CredalNode) -> Result<StateBounds, ExecError> {
    node.table()
        .row(&[])
        .cloned()
        .ok_or_else(|| ExecError::missing_entry(node.name(), AssignmentDisplay(&[])))
}

/// Combines already-computed parent marginals with `node`'s table.
///
/// `parent_marginals` must be aligned with `node.parents()`. This is the core
/// extreme-point step; [`CredalNetwork::propagate`] calls it once per non-root node.
pub fn marginal_from_parents<O>(
    node: &CredalNode,
    parent_marginals: &[StateBounds],
    config: &PropagationConfig,
    diagnostics: &mut PropagationDiagnostics,
    observer: &mut O,
) -> Result<StateBounds, ExecError>
where
    O: PropagationObserver + ?Sized,
{
    if parent_marginals.len() != node.parents().len() {
        return Err(ExecError::Internal(format!(
            "node '{}': {} parent marginals supplied for {} parents",
            node.name(),
            parent_marginals.len(),
            node.parents().len()
        )));
    }

    let node_states = node.states();
    if node_states.is_empty() {
        return Err(ExecError::ValidationError(format!(
            "node '{}' has no credal table",
            node.name()
        )));
    }

    let parent_states: Vec<Vec<StateLabel>> = parent_marginals
        .iter()
        .map(|marginal| marginal.keys().cloned().collect())
        .collect();
    check_coverage(node, &parent_states)?;

    let required = parent_states.iter().fold(1u128, |acc, states| {
        acc.saturating_mul(corner_count(states.len()))
            .saturating_mul(states.len() as u128)
    });
    if required > config.max_enumeration as u128 {
        return Err(ExecError::EnumerationLimit {
            node: node.name().to_string(),
            required,
            limit: config.max_enumeration,
        });
    }

    let mut extreme_sets: Vec<ExtremeSet> = Vec::with_capacity(parent_marginals.len());
    for (parent, marginal) in node.parents().iter().zip(parent_marginals) {
        let set = extreme_distributions(marginal)?;
        diagnostics.extreme_points += set.len();
        diagnostics.degenerate_extremes += set.degenerate();
        observer.on_extremes(node.name(), parent, &set);
        extreme_sets.push(set);
    }

    let mut lower = vec![f64::INFINITY; node_states.len()];
    let mut upper = vec![f64::NEG_INFINITY; node_states.len()];

    if extreme_sets.iter().all(|set| !set.is_empty()) {
        let corner_radices: Vec<usize> = extreme_sets.iter().map(ExtremeSet::len).collect();
        let state_radices: Vec<usize> = parent_states.iter().map(Vec::len).collect();
        let mut corners = vec![0usize; extreme_sets.len()];
        let mut key: Vec<StateLabel> = parent_states.iter().map(|s| s[0].clone()).collect();
        let mut sums = vec![(0.0_f64, 0.0_f64); node_states.len()];

        loop {
            let chosen: Vec<&[f64]> = extreme_sets
                .iter()
                .zip(&corners)
                .map(|(set, &idx)| set.point(idx).unwrap_or(&[]))
                .collect();
            sums.iter_mut().for_each(|s| *s = (0.0, 0.0));

            let mut assignment = vec![0usize; parent_states.len()];
            loop {
                let mut probability = 1.0;
                for (parent_idx, &state_idx) in assignment.iter().enumerate() {
                    key[parent_idx] = parent_states[parent_idx][state_idx].clone();
                    probability *= chosen[parent_idx].get(state_idx).copied().unwrap_or(0.0);
                }

                let row = node
                    .table()
                    .row(&key)
                    .ok_or_else(|| ExecError::missing_entry(node.name(), AssignmentDisplay(&key)))?;

                for (state_idx, state) in node_states.iter().enumerate() {
                    let interval = row.get(state).ok_or_else(|| {
                        ExecError::ValidationError(format!(
                            "node '{}': row {} is missing state '{}'",
                            node.name(),
                            AssignmentDisplay(&key),
                            state
                        ))
                    })?;
                    let scaled_low = probability * interval.low();
                    let scaled_high = probability * interval.high();
                    match config.aggregation {
                        Aggregation::Pointwise => {
                            lower[state_idx] = lower[state_idx].min(scaled_low);
                            upper[state_idx] = upper[state_idx].max(scaled_high);
                        }
                        Aggregation::TotalProbability => {
                            sums[state_idx].0 += scaled_low;
                            sums[state_idx].1 += scaled_high;
                        }
                    }
                }

                diagnostics.assignments_evaluated += 1;
                observer.on_assignment(node.name(), &key, probability);

                if !advance(&mut assignment, &state_radices) {
                    break;
                }
            }

            if config.aggregation == Aggregation::TotalProbability {
                for (state_idx, (low, high)) in sums.iter().enumerate() {
                    lower[state_idx] = lower[state_idx].min(*low);
                    upper[state_idx] = upper[state_idx].max(*high);
                }
            }

            if !advance(&mut corners, &corner_radices) {
                break;
            }
        }
    }

    let mut bounds = StateBounds::new();
    for (state_idx, state) in node_states.into_iter().enumerate() {
        let (mut low, mut high) = (lower[state_idx], upper[state_idx]);
        if low == f64::INFINITY || high == f64::NEG_INFINITY {
            diagnostics.fallback_states += 1;
            low = Interval::VACUOUS.low();
            high = Interval::VACUOUS.high();
        }
        bounds.insert(state, Interval::from_computed(low, high)?);
    }
    Ok(bounds)
}
