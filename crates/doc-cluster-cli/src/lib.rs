//! Command-line front end for doc-cluster.

pub mod cli;
