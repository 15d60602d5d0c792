//! Convergence controller: the assign / update loop.

use crate::assign::{self, Assignment};
use crate::config::KMeansConfig;
use crate::documents::DocumentSet;
use crate::error::{ClusterError, Result};
use crate::init::initialize_centroids;
use crate::sparse::SparseVector;
use crate::update::update_centroids;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Where the loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Running,
    /// Every centroid moved less than the convergence threshold.
    Converged,
    /// The iteration cap was reached first.
    IterationLimit,
}

/// Why a centroid was carried over unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeReason {
    /// No document was assigned to the cluster.
    Empty,
    /// The members' mean had zero norm.
    Degenerate,
}

/// A cluster that kept its previous centroid during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrozenCentroid {
    pub iteration: usize,
    pub cluster: usize,
    pub reason: FreezeReason,
}

/// Final state of a clustering run.
#[derive(Debug, Clone, Serialize)]
pub struct ClusteringOutcome {
    pub state: RunState,
    pub iterations: usize,
    /// Largest centroid movement of the last iteration.
    pub max_delta: f64,
    pub centroids: Vec<SparseVector>,
    /// Assignment computed in the last iteration.
    pub assignment: Assignment,
    /// Cost of each iteration's assignment against the centroids it was
    /// computed from.
    pub cost_history: Vec<f64>,
    pub frozen: Vec<FrozenCentroid>,
}

impl ClusteringOutcome {
    pub fn converged(&self) -> bool {
        self.state == RunState::Converged
    }

    /// Document id → cluster id.
    pub fn inverse_assignment(&self) -> BTreeMap<u32, usize> {
        self.assignment.inverse()
    }
}

/// k-means over sparse document vectors.
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    /// Validate `config` and build the engine.
    pub fn new(config: KMeansConfig) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Cluster `documents` starting from the maximal-dissimilarity seeds.
    pub fn run(&self, documents: &DocumentSet) -> Result<ClusteringOutcome> {
        let centroids = initialize_centroids(documents, &self.config)?;
        self.run_from(documents, centroids)
    }

    /// Cluster `documents` starting from the given centroids.
    ///
    /// Each iteration assigns every document, recomputes every centroid, and
    /// measures `max_i norm(new[i] - old[i])`. The loop stops once that is
    /// below the convergence threshold or after `max_iterations` rounds.
    ///
    /// `initial` must hold exactly `clusters` centroids of the documents'
    /// dimension.
    pub fn run_from(
        &self,
        documents: &DocumentSet,
        initial: Vec<SparseVector>,
    ) -> Result<ClusteringOutcome> {
        if initial.len() != self.config.clusters {
            return Err(ClusterError::InvalidConfig(format!(
                "expected {} initial centroids, got {}",
                self.config.clusters,
                initial.len()
            )));
        }
        if let Some(bad) = initial
            .iter()
            .find(|c| c.dimension() != documents.dimension())
        {
            return Err(ClusterError::DimensionMismatch {
                expected: documents.dimension(),
                found: bad.dimension(),
            });
        }

        let mut centroids = initial;
        let mut state = RunState::Running;
        let mut iterations = 0;
        let mut cost_history = Vec::new();
        let mut frozen = Vec::new();

        let (assignment, max_delta) = loop {
            iterations += 1;

            let current = assign::assign(documents, &centroids);
            let cost = assign::cost(documents, &centroids, &current);
            cost_history.push(cost);

            let step = update_centroids(documents, &current, &centroids, &self.config);
            let freeze = |reason| {
                move |&cluster: &usize| FrozenCentroid {
                    iteration: iterations,
                    cluster,
                    reason,
                }
            };
            frozen.extend(step.empty.iter().map(freeze(FreezeReason::Empty)));
            frozen.extend(step.degenerate.iter().map(freeze(FreezeReason::Degenerate)));

            let max_delta = centroids
                .iter()
                .zip(&step.centroids)
                .map(|(old, new)| old.difference(new).norm())
                .fold(0.0, f64::max);

            debug!(
                iteration = iterations,
                max_delta,
                cost,
                sizes = ?current.sizes(),
                "k-means iteration"
            );

            centroids = step.centroids;

            if max_delta < self.config.convergence_threshold {
                state = RunState::Converged;
            } else if iterations >= self.config.max_iterations {
                state = RunState::IterationLimit;
            }
            if state != RunState::Running {
                break (current, max_delta);
            }
        };

        match state {
            RunState::Converged => info!(iterations, max_delta, "k-means converged"),
            _ => warn!(
                iterations,
                max_delta,
                threshold = self.config.convergence_threshold,
                "k-means stopped at the iteration limit before converging"
            ),
        }

        Ok(ClusteringOutcome {
            state,
            iterations,
            max_delta,
            centroids,
            assignment,
            cost_history,
            frozen,
        })
    }
}
