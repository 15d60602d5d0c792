//! Clustering configuration.

use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLUSTERS: usize = 11;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.025;
pub const DEFAULT_SPARSIFY_THRESHOLD: f64 = 1e-3;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Immutable parameters of one k-means run.
///
/// Built once (from defaults or command-line flags), validated, and passed by
/// reference to every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters `k`.
    pub clusters: usize,
    /// The run converges once every centroid moves less than this.
    pub convergence_threshold: f64,
    /// Averaged centroid entries at or below this magnitude are dropped.
    pub sparsify_threshold: f64,
    /// Hard bound on assign/update rounds.
    pub max_iterations: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            sparsify_threshold: DEFAULT_SPARSIFY_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KMeansConfig {
    /// Default configuration with `clusters` clusters.
    pub fn with_clusters(clusters: usize) -> Self {
        Self {
            clusters,
            ..Self::default()
        }
    }

    /// Check every field; returns `self` for chaining.
    pub fn validate(self) -> Result<Self> {
        if self.clusters == 0 {
            return Err(ClusterError::InvalidConfig(
                "clusters must be at least 1".to_string(),
            ));
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "convergence threshold must be a positive number, got {}",
                self.convergence_threshold
            )));
        }
        if !self.sparsify_threshold.is_finite() || self.sparsify_threshold < 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "sparsify threshold must be non-negative, got {}",
                self.sparsify_threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::InvalidConfig(
                "max iterations must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}
