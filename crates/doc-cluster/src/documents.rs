//! The document set: dense document ids mapped to sparse vectors.

use crate::error::{ClusterError, Result};
use crate::sparse::SparseVector;
use std::collections::BTreeMap;

/// Read-only set of document vectors indexed by id `0..len`.
///
/// All vectors share one dimension. Ids are dense: construction fails on a
/// gap rather than skipping the unrepresented document.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    dimension: usize,
    vectors: Vec<SparseVector>,
}

impl DocumentSet {
    /// Build from an id-keyed map of vectors.
    pub fn from_map(dimension: usize, documents: BTreeMap<u32, SparseVector>) -> Result<Self> {
        if documents.is_empty() {
            return Err(ClusterError::EmptyInput);
        }

        let mut vectors = Vec::with_capacity(documents.len());
        for (expected, (id, vector)) in (0u32..).zip(documents) {
            if id != expected {
                return Err(ClusterError::DocumentGap { missing: expected });
            }
            if vector.dimension() != dimension {
                return Err(ClusterError::DimensionMismatch {
                    expected: dimension,
                    found: vector.dimension(),
                });
            }
            vectors.push(vector);
        }

        Ok(Self { dimension, vectors })
    }

    /// Build from vectors already ordered by id.
    pub fn from_vectors(dimension: usize, vectors: Vec<SparseVector>) -> Result<Self> {
        Self::from_map(dimension, (0u32..).zip(vectors).collect())
    }

    /// Feature dimension `F`.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&SparseVector> {
        self.vectors.get(id as usize)
    }

    /// Documents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SparseVector)> + '_ {
        (0u32..).zip(self.vectors.iter())
    }

    /// Vectors of the given ids. Ids must come from this set.
    pub(crate) fn select<'a>(
        &'a self,
        ids: &'a [u32],
    ) -> impl Iterator<Item = &'a SparseVector> + 'a {
        ids.iter().map(move |&id| &self.vectors[id as usize])
    }
}
