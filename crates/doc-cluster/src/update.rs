//! Centroid update step: sparsified, re-normalized cluster means.

use crate::assign::Assignment;
use crate::config::KMeansConfig;
use crate::documents::DocumentSet;
use crate::sparse::SparseVector;
use tracing::warn;

/// Outcome of recomputing one centroid.
#[derive(Debug, Clone, PartialEq)]
pub enum CentroidUpdate {
    /// New unit-norm centroid.
    Moved(SparseVector),
    /// No members this round; the previous centroid is kept.
    Empty,
    /// The mean had zero norm; the previous centroid is kept.
    Degenerate,
}

/// Result of updating every centroid.
#[derive(Debug, Clone)]
pub struct UpdateStep {
    pub centroids: Vec<SparseVector>,
    /// Clusters that kept their previous centroid because they were empty.
    pub empty: Vec<usize>,
    /// Clusters that kept their previous centroid because the mean vanished.
    pub degenerate: Vec<usize>,
}

/// Recompute one centroid from its members.
///
/// The mean is sparsified with `sparsify_threshold` and scaled back to unit
/// norm. When sparsification removes every entry the plain mean is used
/// instead.
pub fn update_centroid(
    documents: &DocumentSet,
    members: &[u32],
    config: &KMeansConfig,
) -> CentroidUpdate {
    if members.is_empty() {
        return CentroidUpdate::Empty;
    }

    let sum = SparseVector::sum(documents.dimension(), documents.select(members));
    let mean = sum.scale(1.0 / members.len() as f64);

    match mean.sparsify(config.sparsify_threshold).normalize() {
        Ok(centroid) => CentroidUpdate::Moved(centroid),
        Err(_) => match mean.normalize() {
            Ok(centroid) => {
                warn!(
                    members = members.len(),
                    threshold = config.sparsify_threshold,
                    "every mean entry fell below the sparsify threshold; keeping the dense mean"
                );
                CentroidUpdate::Moved(centroid)
            }
            Err(_) => CentroidUpdate::Degenerate,
        },
    }
}

/// Recompute every centroid from `assignment`.
///
/// Clusters with no members, or whose mean is the zero vector, keep their
/// centroid from `previous` and are listed in the result.
pub fn update_centroids(
    documents: &DocumentSet,
    assignment: &Assignment,
    previous: &[SparseVector],
    config: &KMeansConfig,
) -> UpdateStep {
    debug_assert_eq!(assignment.cluster_count(), previous.len());

    let mut step = UpdateStep {
        centroids: Vec::with_capacity(previous.len()),
        empty: Vec::new(),
        degenerate: Vec::new(),
    };

    for (cluster, (members, old)) in assignment.clusters().iter().zip(previous).enumerate() {
        match update_centroid(documents, members, config) {
            CentroidUpdate::Moved(centroid) => step.centroids.push(centroid),
            CentroidUpdate::Empty => {
                warn!(cluster, "cluster attracted no documents; keeping previous centroid");
                step.empty.push(cluster);
                step.centroids.push(old.clone());
            }
            CentroidUpdate::Degenerate => {
                warn!(cluster, "cluster mean has zero norm; keeping previous centroid");
                step.degenerate.push(cluster);
                step.centroids.push(old.clone());
            }
        }
    }

    step
}
