//! Requested-id lists and the `<documentID> <clusterID>` output file.

use crate::error::{ClusterError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tracing::warn;

/// Counts from one [`write_assignments`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// Lines written with a cluster id.
    pub assigned: usize,
    /// Requested ids with no assignment, written bare.
    pub missing: Vec<u32>,
}

/// Read requested document ids, one per line.
///
/// Only the first token of a line is used, so a training file of
/// `pageID category` lines can be passed as is. Blank lines are skipped.
pub fn read_document_ids<R: BufRead>(reader: R) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let id = token.parse().map_err(|_| ClusterError::Parse {
            line: n + 1,
            message: format!("invalid document id '{token}'"),
        })?;
        ids.push(id);
    }
    Ok(ids)
}

/// Write one line per requested id, in request order.
///
/// Assigned ids produce `<id> <cluster>`; ids absent from `inverse` produce
/// `<id>` alone and are listed in the report.
pub fn write_assignments<W: Write>(
    writer: &mut W,
    ids: &[u32],
    inverse: &BTreeMap<u32, usize>,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();
    for &id in ids {
        match inverse.get(&id) {
            Some(cluster) => {
                writeln!(writer, "{id} {cluster}")?;
                report.assigned += 1;
            }
            None => {
                writeln!(writer, "{id}")?;
                report.missing.push(id);
            }
        }
    }

    if !report.missing.is_empty() {
        warn!(
            missing = report.missing.len(),
            first = report.missing[0],
            "requested documents have no cluster assignment"
        );
    }
    Ok(report)
}
