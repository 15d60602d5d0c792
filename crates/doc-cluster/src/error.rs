//! Error types for doc-cluster.

use thiserror::Error;

/// Errors raised while building vectors, validating input, or clustering.
///
/// Recoverable conditions (a cluster that attracted no documents, a
/// requested document with no assignment) are not errors: they are
/// reported through [`crate::ClusteringOutcome`] and
/// [`crate::writer::WriteReport`] instead.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Fewer documents than requested clusters.
    #[error("insufficient data: {documents} documents cannot seed {clusters} clusters")]
    InsufficientData { documents: usize, clusters: usize },

    /// Normalization of an all-zero vector.
    #[error("degenerate vector: {context} has zero norm")]
    DegenerateVector { context: String },

    /// No documents at all.
    #[error("empty input: no documents to cluster")]
    EmptyInput,

    /// A document id inside `0..=max_id` has no vector.
    #[error("document id {missing} is missing from the document set")]
    DocumentGap { missing: u32 },

    /// A vector whose dimension differs from the document set's.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Feature index outside `0..dimension`.
    #[error("index {index} exceeds vector dimension {dimension}")]
    IndexOutOfBounds { index: u32, dimension: usize },

    /// Indices not strictly ascending.
    #[error("indices not sorted or contain duplicates")]
    UnsortedIndices,

    /// Parallel index and value arrays of different lengths.
    #[error("indices and values length mismatch: indices={indices_len}, values={values_len}")]
    LengthMismatch { indices_len: usize, values_len: usize },

    /// NaN or infinite entry.
    #[error("non-finite value {value} at index {index}")]
    NonFiniteValue { index: u32, value: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed line in an input file.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Malformed or incomplete corpus markup.
    #[error("corpus error at byte {position}: {message}")]
    Corpus { position: u64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
