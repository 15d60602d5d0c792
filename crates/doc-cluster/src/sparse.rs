//! Fixed-dimension sparse vectors over `f64`.
//!
//! Entries are stored as parallel, strictly ascending index / value arrays.
//! Absent indices are zero and an entry with value exactly `0.0` is never
//! stored. Every operation returns a fresh vector.
//!
//! Binary operations walk both index arrays with a merge-join, so their cost
//! is `O(nnz(a) + nnz(b))` regardless of the dimension.

use crate::error::{ClusterError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A sparse vector of fixed dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparseVector {
    dimension: usize,
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build a vector from parallel index / value arrays.
    ///
    /// Indices must be strictly ascending and below `dimension`; values must
    /// be finite. Zero values are dropped.
    pub fn new(dimension: usize, indices: Vec<u32>, values: Vec<f64>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(ClusterError::LengthMismatch {
                indices_len: indices.len(),
                values_len: values.len(),
            });
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ClusterError::UnsortedIndices);
        }
        for (&index, &value) in indices.iter().zip(values.iter()) {
            if index as usize >= dimension {
                return Err(ClusterError::IndexOutOfBounds { index, dimension });
            }
            if !value.is_finite() {
                return Err(ClusterError::NonFiniteValue { index, value });
            }
        }
        Ok(Self::from_sorted(dimension, indices.into_iter().zip(values)))
    }

    /// Build a vector from unordered `(index, value)` entries.
    ///
    /// Duplicate indices are summed.
    pub fn from_entries(
        dimension: usize,
        entries: impl IntoIterator<Item = (u32, f64)>,
    ) -> Result<Self> {
        let mut acc: BTreeMap<u32, f64> = BTreeMap::new();
        for (index, value) in entries {
            *acc.entry(index).or_insert(0.0) += value;
        }
        let (indices, values) = acc.into_iter().unzip();
        Self::new(dimension, indices, values)
    }

    /// The all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Collect already ascending entries, skipping zeros.
    fn from_sorted(dimension: usize, entries: impl Iterator<Item = (u32, f64)>) -> Self {
        let (indices, values) = entries.filter(|&(_, v)| v != 0.0).unzip();
        Self {
            dimension,
            indices,
            values,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at `index`, zero when absent.
    pub fn get(&self, index: u32) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Stored entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        let largest = self.max_abs();
        if largest == 0.0 {
            return 0.0;
        }
        largest * self.relative_norm(largest)
    }

    fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Norm of `self / largest`; always in `[1, sqrt(nnz)]`.
    fn relative_norm(&self, largest: f64) -> f64 {
        self.values
            .iter()
            .map(|v| {
                let r = v / largest;
                r * r
            })
            .sum::<f64>()
            .sqrt()
    }

    pub fn squared_distance(&self, other: &SparseVector) -> f64 {
        debug_assert_eq!(self.dimension, other.dimension);
        self.union(other)
            .map(|(_, a, b)| {
                let d = a - b;
                d * d
            })
            .sum()
    }

    /// Entrywise `other - self`.
    pub fn difference(&self, other: &SparseVector) -> SparseVector {
        debug_assert_eq!(self.dimension, other.dimension);
        Self::from_sorted(self.dimension, self.union(other).map(|(i, a, b)| (i, b - a)))
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&self, factor: f64) -> SparseVector {
        Self::from_sorted(self.dimension, self.iter().map(|(i, v)| (i, v * factor)))
    }

    /// Scale to unit Euclidean norm.
    ///
    /// Fails with [`ClusterError::DegenerateVector`] for the all-zero vector.
    pub fn normalize(&self) -> Result<SparseVector> {
        let largest = self.max_abs();
        if largest == 0.0 || !largest.is_finite() {
            return Err(ClusterError::DegenerateVector {
                context: format!("sparse vector of dimension {}", self.dimension),
            });
        }
        // divide by the largest magnitude first so squaring cannot overflow
        // or underflow
        let norm = self.relative_norm(largest);
        Ok(Self::from_sorted(
            self.dimension,
            self.iter().map(|(i, v)| (i, v / largest / norm)),
        ))
    }

    /// Drop every entry whose magnitude is at or below `threshold`.
    pub fn sparsify(&self, threshold: f64) -> SparseVector {
        Self::from_sorted(
            self.dimension,
            self.iter().filter(|&(_, v)| v.abs() > threshold),
        )
    }

    /// Entrywise sum of `vectors`, all of dimension `dimension`.
    pub fn sum<'a>(
        dimension: usize,
        vectors: impl IntoIterator<Item = &'a SparseVector>,
    ) -> SparseVector {
        let mut acc: BTreeMap<u32, f64> = BTreeMap::new();
        for v in vectors {
            debug_assert_eq!(v.dimension, dimension);
            for (i, x) in v.iter() {
                *acc.entry(i).or_insert(0.0) += x;
            }
        }
        Self::from_sorted(dimension, acc.into_iter())
    }

    /// Count of indices present in `self` but absent from `other`.
    pub fn missing_from(&self, other: &SparseVector) -> usize {
        let mut missing = 0;
        let mut j = 0;
        for &index in &self.indices {
            while j < other.indices.len() && other.indices[j] < index {
                j += 1;
            }
            if j >= other.indices.len() || other.indices[j] != index {
                missing += 1;
            }
        }
        missing
    }

    fn union<'a>(&'a self, other: &'a SparseVector) -> Union<'a> {
        Union {
            a: self,
            b: other,
            i: 0,
            j: 0,
        }
    }
}

/// Merge-join over two vectors yielding `(index, a[index], b[index])` for
/// every index present in either.
struct Union<'a> {
    a: &'a SparseVector,
    b: &'a SparseVector,
    i: usize,
    j: usize,
}

impl Iterator for Union<'_> {
    type Item = (u32, f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let a = self.a.indices.get(self.i).copied();
        let b = self.b.indices.get(self.j).copied();
        match (a, b) {
            (None, None) => None,
            (Some(ia), None) => {
                self.i += 1;
                Some((ia, self.a.values[self.i - 1], 0.0))
            }
            (None, Some(ib)) => {
                self.j += 1;
                Some((ib, 0.0, self.b.values[self.j - 1]))
            }
            (Some(ia), Some(ib)) => match ia.cmp(&ib) {
                Ordering::Less => {
                    self.i += 1;
                    Some((ia, self.a.values[self.i - 1], 0.0))
                }
                Ordering::Greater => {
                    self.j += 1;
                    Some((ib, 0.0, self.b.values[self.j - 1]))
                }
                Ordering::Equal => {
                    self.i += 1;
                    self.j += 1;
                    Some((ia, self.a.values[self.i - 1], self.b.values[self.j - 1]))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(dimension: usize, entries: &[(u32, f64)]) -> SparseVector {
        SparseVector::from_entries(dimension, entries.iter().copied()).unwrap()
    }

    #[test]
    fn test_new_rejects_unsorted_indices() {
        let err = SparseVector::new(10, vec![3, 1], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ClusterError::UnsortedIndices));

        let err = SparseVector::new(10, vec![1, 1], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ClusterError::UnsortedIndices));
    }

    #[test]
    fn test_new_rejects_out_of_bounds_and_non_finite() {
        let err = SparseVector::new(4, vec![4], vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::IndexOutOfBounds {
                index: 4,
                dimension: 4
            }
        ));

        let err = SparseVector::new(4, vec![0], vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, ClusterError::NonFiniteValue { index: 0, .. }));

        let err = SparseVector::new(4, vec![0, 1], vec![1.0]).unwrap_err();
        assert!(matches!(err, ClusterError::LengthMismatch { .. }));
    }

    #[test]
    fn test_zero_entries_are_not_stored() {
        let v = SparseVector::new(5, vec![0, 2, 4], vec![1.0, 0.0, -2.0]).unwrap();
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.get(4), -2.0);
    }

    #[test]
    fn test_from_entries_sums_duplicates() {
        let v = vector(8, &[(5, 1.0), (2, 0.5), (5, 2.0)]);
        assert_eq!(v.indices(), &[2, 5]);
        assert_eq!(v.values(), &[0.5, 3.0]);
    }

    #[test]
    fn test_squared_distance_over_union() {
        let a = vector(10, &[(0, 1.0), (3, 2.0)]);
        let b = vector(10, &[(3, 1.0), (7, 2.0)]);
        // (1-0)^2 + (2-1)^2 + (0-2)^2
        assert!((a.squared_distance(&b) - 6.0).abs() < 1e-12);
        assert_eq!(a.squared_distance(&a), 0.0);
        assert!((a.squared_distance(&b) - b.squared_distance(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_difference_is_other_minus_self() {
        let a = vector(10, &[(0, 1.0), (3, 2.0)]);
        let b = vector(10, &[(3, 2.0), (7, 0.5)]);
        let d = a.difference(&b);
        assert_eq!(d.get(0), -1.0);
        assert_eq!(d.get(3), 0.0);
        assert_eq!(d.get(7), 0.5);
        // index 3 cancels out and is not stored
        assert_eq!(d.nnz(), 2);
    }

    #[test]
    fn test_norm() {
        let v = vector(4, &[(0, 3.0), (2, 4.0)]);
        assert!((v.norm() - 5.0).abs() < 1e-12);
        assert_eq!(SparseVector::zeros(4).norm(), 0.0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let v = vector(16, &[(1, 0.3), (4, -2.0), (9, 7.5)]);
        let once = v.normalize().unwrap();
        let twice = once.normalize().unwrap();
        assert!((once.norm() - 1.0).abs() < 1e-12);
        for (index, value) in once.iter() {
            assert!((twice.get(index) - value).abs() < 1e-12);
        }
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        let err = SparseVector::zeros(3).normalize().unwrap_err();
        assert!(matches!(err, ClusterError::DegenerateVector { .. }));
    }

    #[test]
    fn test_normalize_extreme_magnitudes() {
        let big = SparseVector::new(3, vec![0, 2], vec![3e200, 4e200]).unwrap();
        assert!((big.norm() - 5e200).abs() / 5e200 < 1e-12);
        let n = big.normalize().unwrap();
        assert_eq!(n.nnz(), 2);
        assert!((n.get(0) - 0.6).abs() < 1e-12);
        assert!((n.norm() - 1.0).abs() < 1e-12);

        let tiny = SparseVector::new(3, vec![1], vec![-1e-200]).unwrap();
        let n = tiny.normalize().unwrap();
        assert_eq!(n.get(1), -1.0);
    }

    #[test]
    fn test_sparsify_threshold() {
        let v = vector(10, &[(0, 0.5), (1, 0.001), (2, -0.0005), (3, -0.2), (4, 0.0011)]);
        let s = v.sparsify(0.001);
        assert_eq!(s.indices(), &[0, 3, 4]);
        // kept entries are preserved exactly
        assert_eq!(s.get(0), 0.5);
        assert_eq!(s.get(3), -0.2);
        assert_eq!(s.get(4), 0.0011);
    }

    #[test]
    fn test_sum_and_scale() {
        let a = vector(6, &[(0, 1.0), (2, 1.0)]);
        let b = vector(6, &[(2, 1.0), (5, 4.0)]);
        let total = SparseVector::sum(6, [&a, &b]);
        assert_eq!(total.get(2), 2.0);
        let mean = total.scale(0.5);
        assert_eq!(mean.get(0), 0.5);
        assert_eq!(mean.get(2), 1.0);
        assert_eq!(mean.get(5), 2.0);
    }

    #[test]
    fn test_missing_from() {
        let a = vector(10, &[(0, 1.0), (2, 1.0), (4, 1.0)]);
        let b = vector(10, &[(2, 1.0), (3, 1.0)]);
        assert_eq!(a.missing_from(&b), 2);
        assert_eq!(b.missing_from(&a), 1);
        assert_eq!(a.missing_from(&a), 0);
        assert_eq!(a.missing_from(&SparseVector::zeros(10)), 3);
    }
}
