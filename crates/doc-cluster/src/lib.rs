//! doc-cluster: k-means clustering of documents as sparse feature vectors.
//!
//! The engine seeds `k` centroids by maximal dissimilarity, then alternates
//! nearest-centroid assignment and sparsified, re-normalized mean updates
//! until no centroid moves more than the convergence threshold.
//!
//! ```no_run
//! use doc_cluster::{read_vecrep, KMeans, KMeansConfig};
//! use std::io::BufReader;
//!
//! let file = std::fs::File::open("vecrep.dat")?;
//! let documents = read_vecrep(BufReader::new(file), None)?;
//! let outcome = KMeans::new(KMeansConfig::with_clusters(11))?.run(&documents)?;
//! for (document, cluster) in outcome.inverse_assignment() {
//!     println!("{document} {cluster}");
//! }
//! # Ok::<(), doc_cluster::ClusterError>(())
//! ```

pub mod assign;
pub mod config;
pub mod documents;
pub mod error;
pub mod init;
pub mod kmeans;
pub mod sparse;
pub mod update;
pub mod vecrep;
pub mod vectorize;
pub mod writer;

pub use assign::Assignment;
pub use config::KMeansConfig;
pub use documents::DocumentSet;
pub use error::{ClusterError, Result};
pub use kmeans::{ClusteringOutcome, FreezeReason, FrozenCentroid, KMeans, RunState};
pub use sparse::SparseVector;
pub use vecrep::{read_vecrep, write_vecrep, VecrepRecord};
pub use writer::{read_document_ids, write_assignments, WriteReport};
