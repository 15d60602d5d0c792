//! The vecrep file: one document per line as raw feature occurrence counts.
//!
//! ```text
//! pageID sum_d f_i:occ_i f_i:occ_i ...
//! ```
//!
//! `sum_d` is the sum of squared occurrence counts and feature indices are
//! ascending. Loading normalizes every document to unit length.

use crate::documents::DocumentSet;
use crate::error::{ClusterError, Result};
use crate::sparse::SparseVector;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tracing::debug;

/// Occurrence counts of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecrepRecord {
    pub id: u32,
    /// Feature index → occurrence count.
    pub counts: BTreeMap<u32, u32>,
}

impl VecrepRecord {
    /// Sum of squared occurrence counts (`sum_d`).
    pub fn sum_of_squares(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c) * u64::from(c)).sum()
    }
}

/// Write records in ascending id order.
pub fn write_vecrep<W: Write>(writer: &mut W, records: &[VecrepRecord]) -> Result<()> {
    let mut ordered: Vec<&VecrepRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.id);

    for record in ordered {
        write!(writer, "{} {}", record.id, record.sum_of_squares())?;
        for (feature, count) in &record.counts {
            write!(writer, " {feature}:{count}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Parse a vecrep stream into a normalized document set.
///
/// `dimension` is the feature count; when `None` it is inferred as the
/// largest feature index plus one. The stored `sum_d` is not trusted: each
/// norm is recomputed from the entries.
pub fn read_vecrep<R: BufRead>(reader: R, dimension: Option<usize>) -> Result<DocumentSet> {
    let mut raw: BTreeMap<u32, Vec<(u32, f64)>> = BTreeMap::new();
    let mut max_index: Option<u32> = None;

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = n + 1;
        if line.trim().is_empty() {
            continue;
        }

        let (id, sum_d, entries) = parse_line(line_no, &line)?;
        let computed: f64 = entries.iter().map(|(_, v)| v * v).sum();
        if (computed - sum_d).abs() > 1e-6 {
            debug!(document = id, stored = sum_d, computed, "stale sum_d in vecrep line");
        }
        max_index = max_index.max(entries.iter().map(|&(i, _)| i).max());
        if raw.insert(id, entries).is_some() {
            return Err(ClusterError::Parse {
                line: line_no,
                message: format!("duplicate document id {id}"),
            });
        }
    }

    let dimension = dimension.unwrap_or_else(|| max_index.map_or(0, |i| i as usize + 1));

    let mut documents = BTreeMap::new();
    for (id, entries) in raw {
        let vector = SparseVector::from_entries(dimension, entries)?
            .normalize()
            .map_err(|_| ClusterError::DegenerateVector {
                context: format!("document {id}"),
            })?;
        documents.insert(id, vector);
    }

    DocumentSet::from_map(dimension, documents)
}

fn parse_line(line_no: usize, line: &str) -> Result<(u32, f64, Vec<(u32, f64)>)> {
    let parse_err = |message: String| ClusterError::Parse {
        line: line_no,
        message,
    };

    let mut tokens = line.split_whitespace();
    let id = tokens
        .next()
        .ok_or_else(|| parse_err("missing document id".to_string()))?;
    let id: u32 = id
        .parse()
        .map_err(|_| parse_err(format!("invalid document id '{id}'")))?;

    let sum_d = tokens
        .next()
        .ok_or_else(|| parse_err(format!("missing sum_d for document {id}")))?;
    let sum_d: f64 = sum_d
        .parse()
        .map_err(|_| parse_err(format!("invalid sum_d '{sum_d}'")))?;

    let mut entries = Vec::new();
    for token in tokens {
        let (feature, count) = token
            .split_once(':')
            .ok_or_else(|| parse_err(format!("expected feature:count, got '{token}'")))?;
        let feature: u32 = feature
            .parse()
            .map_err(|_| parse_err(format!("invalid feature index '{feature}'")))?;
        let count: f64 = count
            .parse()
            .map_err(|_| parse_err(format!("invalid count '{count}'")))?;
        entries.push((feature, count));
    }

    Ok((id, sum_d, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(id: u32, counts: &[(u32, u32)]) -> VecrepRecord {
        VecrepRecord {
            id,
            counts: counts.iter().copied().collect(),
        }
    }

    #[test]
    fn test_write_format() {
        let mut out = Vec::new();
        write_vecrep(
            &mut out,
            &[record(1, &[(4, 1)]), record(0, &[(0, 2), (3, 1)])],
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 5 0:2 3:1\n1 1 4:1\n");
    }

    #[test]
    fn test_read_normalizes() {
        let input = "0 25 0:3 2:4\n1 1 1:1\n";
        let docs = read_vecrep(Cursor::new(input), Some(5)).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs.dimension(), 5);
        let v = docs.get(0).unwrap();
        assert!((v.get(0) - 0.6).abs() < 1e-12);
        assert!((v.get(2) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_read_infers_dimension() {
        let input = "0 1 7:1\n\n1 2 0:1 3:1\n";
        let docs = read_vecrep(Cursor::new(input), None).unwrap();
        assert_eq!(docs.dimension(), 8);
    }

    #[test]
    fn test_infers_dimension_from_unordered_entries() {
        let set = read_vecrep(Cursor::new("0 2 7:1 2:1\n"), None).unwrap();
        assert_eq!(set.dimension(), 8);
        let doc = set.get(0).unwrap();
        assert_eq!(doc.indices(), &[2, 7]);
    }

    #[test]
    fn test_stale_sum_is_ignored() {
        // sum_d written from squared feature indices rather than counts
        let input = "0 13 2:1 3:1\n";
        let docs = read_vecrep(Cursor::new(input), None).unwrap();
        assert!((docs.get(0).unwrap().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_written_file_reads_back_as_unit_vectors() {
        let mut out = Vec::new();
        write_vecrep(&mut out, &[record(0, &[(1, 2)]), record(1, &[(0, 1), (2, 1)])]).unwrap();
        let docs = read_vecrep(Cursor::new(out), Some(3)).unwrap();
        for (_, v) in docs.iter() {
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_document_without_features_is_degenerate() {
        let input = "0 1 0:1\n1 0\n";
        let err = read_vecrep(Cursor::new(input), None).unwrap_err();
        match err {
            ClusterError::DegenerateVector { context } => assert_eq!(context, "document 1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_gap_in_ids() {
        let input = "0 1 0:1\n2 1 1:1\n";
        let err = read_vecrep(Cursor::new(input), None).unwrap_err();
        assert!(matches!(err, ClusterError::DocumentGap { missing: 1 }));
    }

    #[test]
    fn test_malformed_lines() {
        let err = read_vecrep(Cursor::new("0 1 0-1\n"), None).unwrap_err();
        assert!(matches!(err, ClusterError::Parse { line: 1, .. }));

        let err = read_vecrep(Cursor::new("0 1 0:1\nx 1 0:1\n"), None).unwrap_err();
        assert!(matches!(err, ClusterError::Parse { line: 2, .. }));

        let err = read_vecrep(Cursor::new("0\n"), None).unwrap_err();
        assert!(matches!(err, ClusterError::Parse { line: 1, .. }));

        let err = read_vecrep(Cursor::new("0 1 0:1\n0 1 1:1\n"), None).unwrap_err();
        assert!(matches!(err, ClusterError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_index_beyond_declared_dimension() {
        let err = read_vecrep(Cursor::new("0 1 9:1\n"), Some(4)).unwrap_err();
        assert!(matches!(err, ClusterError::IndexOutOfBounds { index: 9, .. }));
    }
}
