//! Assignment step: every document goes to its nearest centroid.

use crate::documents::DocumentSet;
use crate::sparse::SparseVector;
use serde::Serialize;
use std::collections::BTreeMap;

/// Partition of document ids into `k` clusters.
///
/// Each member list is ascending. Lists are pairwise disjoint and together
/// cover every document id of the set they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    clusters: Vec<Vec<u32>>,
}

impl Assignment {
    /// Number of clusters `k`.
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Document ids assigned to `cluster`.
    pub fn members(&self, cluster: usize) -> &[u32] {
        self.clusters
            .get(cluster)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Member count per cluster.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }

    /// Clusters that received no documents.
    pub fn empty_clusters(&self) -> Vec<usize> {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, members)| members.is_empty())
            .map(|(c, _)| c)
            .collect()
    }

    /// Document id → cluster id.
    pub fn inverse(&self) -> BTreeMap<u32, usize> {
        self.clusters
            .iter()
            .enumerate()
            .flat_map(|(c, members)| members.iter().map(move |&id| (id, c)))
            .collect()
    }

    pub(crate) fn clusters(&self) -> &[Vec<u32>] {
        &self.clusters
    }
}

/// Index and squared distance of the centroid closest to `document`.
///
/// Ties go to the lowest cluster id.
pub fn nearest_centroid(centroids: &[SparseVector], document: &SparseVector) -> (usize, f64) {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = centroid.squared_distance(document);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    (best_cluster, best_dist)
}

/// Assign every document to its nearest centroid.
///
/// Distances are compared squared; the ordering is the same and the square
/// root is skipped.
pub fn assign(documents: &DocumentSet, centroids: &[SparseVector]) -> Assignment {
    let mut clusters = vec![Vec::new(); centroids.len()];
    for (id, document) in documents.iter() {
        let (cluster, _) = nearest_centroid(centroids, document);
        clusters[cluster].push(id);
    }
    Assignment { clusters }
}

/// Sum of squared distances from each document to its assigned centroid.
pub fn cost(documents: &DocumentSet, centroids: &[SparseVector], assignment: &Assignment) -> f64 {
    assignment
        .clusters
        .iter()
        .zip(centroids)
        .map(|(members, centroid)| {
            documents
                .select(members)
                .map(|doc| centroid.squared_distance(doc))
                .sum::<f64>()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn vector(dimension: usize, entries: &[(u32, f64)]) -> SparseVector {
        SparseVector::from_entries(dimension, entries.iter().copied())
            .unwrap()
            .normalize()
            .unwrap()
    }

    fn sample_documents() -> DocumentSet {
        DocumentSet::from_vectors(
            3,
            vec![
                vector(3, &[(0, 1.0)]),
                vector(3, &[(0, 0.9), (1, 0.1)]),
                vector(3, &[(1, 1.0)]),
                vector(3, &[(1, 0.8), (2, 0.6)]),
                vector(3, &[(2, 1.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_centroid() {
        let centroids = vec![vector(3, &[(0, 1.0)]), vector(3, &[(1, 1.0)])];
        let (c, d) = nearest_centroid(&centroids, &vector(3, &[(1, 1.0), (2, 0.1)]));
        assert_eq!(c, 1);
        assert!(d > 0.0);
    }

    #[test]
    fn test_ties_go_to_lowest_cluster() {
        let centroids = vec![vector(2, &[(0, 1.0)]), vector(2, &[(1, 1.0)])];
        let (c, _) = nearest_centroid(&centroids, &vector(2, &[(0, 1.0), (1, 1.0)]));
        assert_eq!(c, 0);

        let duplicated = vec![vector(2, &[(1, 1.0)]), vector(2, &[(1, 1.0)])];
        let (c, d) = nearest_centroid(&duplicated, &vector(2, &[(1, 1.0)]));
        assert_eq!(c, 0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_assignment_is_a_partition() {
        let docs = sample_documents();
        let centroids = vec![
            vector(3, &[(0, 1.0)]),
            vector(3, &[(1, 1.0)]),
            vector(3, &[(2, 1.0)]),
        ];
        let assignment = assign(&docs, &centroids);
        assert_eq!(assignment.cluster_count(), 3);

        let mut seen = HashSet::new();
        for c in 0..assignment.cluster_count() {
            for &id in assignment.members(c) {
                assert!(seen.insert(id), "document {id} assigned twice");
            }
        }
        let all: HashSet<u32> = docs.iter().map(|(id, _)| id).collect();
        assert_eq!(seen, all);
        assert_eq!(assignment.sizes().iter().sum::<usize>(), docs.len());
    }

    #[test]
    fn test_members_and_inverse() {
        let docs = sample_documents();
        let centroids = vec![vector(3, &[(0, 1.0)]), vector(3, &[(2, 1.0)])];
        let assignment = assign(&docs, &centroids);

        assert_eq!(assignment.members(0), &[0, 1, 2]);
        assert_eq!(assignment.members(1), &[3, 4]);
        assert!(assignment.members(7).is_empty());

        let inverse = assignment.inverse();
        assert_eq!(inverse.len(), 5);
        assert_eq!(inverse[&1], 0);
        assert_eq!(inverse[&4], 1);
    }

    #[test]
    fn test_empty_clusters_reported() {
        let docs = sample_documents();
        let centroids = vec![
            vector(3, &[(0, 1.0)]),
            vector(3, &[(0, 1.0)]),
            vector(3, &[(1, 1.0)]),
        ];
        let assignment = assign(&docs, &centroids);
        assert_eq!(assignment.empty_clusters(), vec![1]);
    }

    #[test]
    fn test_cost_is_zero_when_centroids_match_documents() {
        let docs = DocumentSet::from_vectors(
            2,
            vec![vector(2, &[(0, 1.0)]), vector(2, &[(1, 1.0)])],
        )
        .unwrap();
        let centroids = vec![vector(2, &[(0, 1.0)]), vector(2, &[(1, 1.0)])];
        let assignment = assign(&docs, &centroids);
        assert_eq!(cost(&docs, &centroids, &assignment), 0.0);
    }
}
