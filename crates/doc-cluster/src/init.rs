//! Centroid seeding by maximal dissimilarity.

use crate::config::KMeansConfig;
use crate::documents::DocumentSet;
use crate::error::{ClusterError, Result};
use crate::sparse::SparseVector;
use tracing::debug;

/// Pick `config.clusters` initial centroids from the document set.
///
/// Centroid 0 is the lowest document id. Each later centroid is the unused
/// document that lacks the most features of the previously chosen centroid
/// (`previous.missing_from(candidate)`). Candidates are scanned in ascending
/// id order and ties keep the first one found, so seeding is deterministic.
///
/// This is a spread heuristic, not k-means++. Each document seeds at most one
/// centroid.
pub fn initialize_centroids(
    documents: &DocumentSet,
    config: &KMeansConfig,
) -> Result<Vec<SparseVector>> {
    let seeds = seed_documents(documents, config.clusters)?;
    Ok(seeds
        .iter()
        .filter_map(|&id| documents.get(id).cloned())
        .collect())
}

/// Document ids chosen as seeds, in cluster order.
pub(crate) fn seed_documents(documents: &DocumentSet, k: usize) -> Result<Vec<u32>> {
    if k == 0 || documents.len() < k {
        return Err(ClusterError::InsufficientData {
            documents: documents.len(),
            clusters: k,
        });
    }

    let mut pool: Vec<(u32, &SparseVector)> = documents.iter().collect();
    let mut seeds: Vec<u32> = Vec::with_capacity(k);

    let (first_id, mut previous) = pool.remove(0);
    debug!(cluster = 0, document = first_id, "seeded centroid");
    seeds.push(first_id);

    for cluster in 1..k {
        let mut best_pos = 0;
        let mut best_missing = previous.missing_from(pool[0].1);
        for (pos, (_, candidate)) in pool.iter().enumerate().skip(1) {
            let missing = previous.missing_from(candidate);
            if missing > best_missing {
                best_missing = missing;
                best_pos = pos;
            }
        }

        let (id, chosen) = pool.remove(best_pos);
        debug!(cluster, document = id, missing = best_missing, "seeded centroid");
        seeds.push(id);
        previous = chosen;
    }

    Ok(seeds)
}
