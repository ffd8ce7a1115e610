//! Deployment cost model and the exhaustive optimizer.

use crate::{
    Element, OptimizeError, Oracle, Plan, Result, display_chain, init_dependency,
    split_and_consolidate,
};
use adn_config::{CostWeights, EquivalenceLevel, StateDependence, TrafficPath};
use itertools::Itertools;

/// Returns the cost of running `chain` on `path`.
///
/// Every element costs its weight times the fraction of traffic still flowing through it, and
/// every drop or block element removes a fixed fraction of the traffic behind it. Each non-empty
/// side pays a deployment overhead, plus a penalty if it hosts strongly consistent state that is
/// not replicated there.
pub fn cost(chain: &[Element], path: TrafficPath, weights: &CostWeights) -> Result<f64> {
    let np = chain.iter().position(Element::is_network).ok_or(OptimizeError::MissingNetwork)?;

    let mut total = 0.0;
    let mut workload = 1.0;
    for element in chain {
        let weight = if element.is_network() { weights.network } else { weights.element };
        total += workload * weight;
        if element.effects(path).drops_or_blocks() {
            workload *= 1.0 - weights.drop;
        }
    }

    let (client, server) = (&chain[..np], &chain[np + 1..]);
    let unreplicated = |side: &[Element], replica: StateDependence| {
        side.iter().any(|e| e.is_strong() && e.state.state_dependence != replica)
    };
    if unreplicated(client, StateDependence::ClientReplica) {
        total += weights.strong;
    }
    if unreplicated(server, StateDependence::ServerReplica) {
        total += weights.strong;
    }
    for side in [client, server] {
        if !side.is_empty() {
            total += weights.deploy;
        }
    }
    Ok(total)
}

/// Statistics from an exhaustive search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExhaustiveStats {
    /// Number of permutations enumerated.
    pub permutations: usize,
    /// Number of permutations equivalent to the original chain.
    pub equivalent: usize,
    /// Cost of the original chain.
    pub original_cost: f64,
    /// Cost of the chosen chain.
    pub best_cost: f64,
}

/// Minimum-cost search over every permutation of a chain.
#[derive(Debug)]
pub struct ExhaustiveOptimizer<'a> {
    path: TrafficPath,
    level: EquivalenceLevel,
    weights: &'a CostWeights,
    max_len: usize,
    /// Statistics from the last run.
    pub stats: ExhaustiveStats,
}

impl<'a> ExhaustiveOptimizer<'a> {
    /// Creates a new optimizer rejecting chains longer than `max_len`.
    #[must_use]
    pub fn new(
        path: TrafficPath,
        level: EquivalenceLevel,
        weights: &'a CostWeights,
        max_len: usize,
    ) -> Self {
        Self { path, level, weights, max_len, stats: ExhaustiveStats::default() }
    }

    /// Returns the cheapest position-valid permutation of `chain` equivalent to it.
    ///
    /// Permutations are visited in lexicographic index order and only a strictly cheaper one
    /// replaces the current best, so the original chain wins ties.
    pub fn run(&mut self, mut chain: Vec<Element>) -> Result<Vec<Element>> {
        if chain.len() > self.max_len {
            return Err(OptimizeError::ChainTooLong { len: chain.len(), max: self.max_len });
        }
        self.stats = ExhaustiveStats::default();
        let original_cost = cost(&chain, self.path, self.weights)?;
        self.stats.original_cost = original_cost;

        init_dependency(&mut chain, self.path);
        let oracle = Oracle::new(&chain, self.path, self.level)?;
        let mut best: Option<Vec<Element>> = None;
        let mut min_cost = original_cost;
        for order in (0..chain.len()).permutations(chain.len()) {
            self.stats.permutations += 1;
            let candidate: Vec<Element> = order.iter().map(|&i| chain[i].clone()).collect();
            if !oracle.accepts(&candidate)? {
                continue;
            }
            self.stats.equivalent += 1;
            let candidate_cost = cost(&candidate, self.path, self.weights)?;
            if candidate_cost < min_cost {
                trace!(cost = candidate_cost, chain = %display_chain(&candidate), "cheaper chain");
                min_cost = candidate_cost;
                best = Some(candidate);
            }
        }

        self.stats.best_cost = min_cost;
        let chain = best.unwrap_or(chain);
        debug!(
            original_cost,
            best_cost = min_cost,
            equivalent = self.stats.equivalent,
            chain = %display_chain(&chain),
            "exhaustive search done",
        );
        Ok(chain)
    }
}

/// Returns the cheapest equivalent permutation of `chain`, split at the network marker and fused.
pub fn cost_chain_optimize(
    chain: Vec<Element>,
    path: TrafficPath,
    level: EquivalenceLevel,
    weights: &CostWeights,
    max_len: usize,
) -> Result<Plan> {
    let chain = ExhaustiveOptimizer::new(path, level, weights, max_len).run(chain)?;
    Ok(split_and_consolidate(chain))
}
