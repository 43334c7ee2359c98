//! Layer-parallel propagation.
//!
//! Nodes are grouped into topological layers; every node in a layer depends only
//! on earlier layers, so a layer's marginals can be computed concurrently against
//! a read-only map of finished results. The output is identical to
//! [`CredalNetwork::propagate_with_config`].
//!
//! ## Feature gating
//!
//! Parallel execution is behind the `parallel` feature flag. Without it,
//! [`CredalNetwork::propagate_parallel`] runs the sequential algorithm.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::errors::ExecError;
use crate::engine::network::CredalNetwork;
use crate::engine::propagation::{Marginals, PropagationConfig, PropagationDiagnostics};

impl CredalNetwork {
    /// Computes marginal bounds for every node, one topological layer at a time.
    #[cfg(feature = "parallel")]
    pub fn propagate_parallel(
        &self,
        config: PropagationConfig,
    ) -> Result<(Marginals, PropagationDiagnostics), ExecError> {
        use crate::engine::observer::NoopObserver;
        use crate::engine::propagation::{marginal_from_parents, root_marginal};
        use crate::engine::table::StateBounds;
        use std::sync::Arc;

        let config = config.validate()?;
        let layers = self.topological_layers()?;
        let mut marginals = Marginals::new();
        let mut diagnostics = PropagationDiagnostics::default();

        for layer in layers {
            let finished = &marginals;
            let computed: Vec<(Arc<str>, StateBounds, PropagationDiagnostics)> = layer
                .into_par_iter()
                .map(|name| {
                    let node = self
                        .node(&name)
                        .ok_or_else(|| ExecError::UnknownNode(name.to_string()))?;
                    let mut local = PropagationDiagnostics {
                        nodes_computed: 1,
                        ..PropagationDiagnostics::default()
                    };
                    let bounds = if node.is_root() {
                        root_marginal(node)?
                    } else {
                        let parents: Vec<StateBounds> = node
                            .parents()
                            .iter()
                            .map(|parent| {
                                finished.get(parent).cloned().ok_or_else(|| {
                                    ExecError::Internal(format!(
                                        "parent '{}' of '{}' not resolved by an earlier layer",
                                        parent, name
                                    ))
                                })
                            })
                            .collect::<Result<_, _>>()?;
                        local.cache_hits = parents.len();
                        marginal_from_parents(node, &parents, &config, &mut local, &mut NoopObserver)?
                    };
                    Ok((name, bounds, local))
                })
                .collect::<Result<Vec<_>, ExecError>>()?;

            for (name, bounds, local) in computed {
                diagnostics.merge(&local);
                marginals.insert(name, bounds);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = diagnostics.nodes_computed,
            "parallel propagation complete"
        );

        Ok((marginals, diagnostics))
    }

    /// Sequential fallback for layer-parallel propagation.
    #[cfg(not(feature = "parallel"))]
    pub fn propagate_parallel(
        &self,
        config: PropagationConfig,
    ) -> Result<(Marginals, PropagationDiagnostics), ExecError> {
        self.propagate_with_config_diagnostics(config)
    }
}
