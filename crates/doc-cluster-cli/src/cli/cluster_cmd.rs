//! `doc-cluster cluster` — k-means over a vecrep file.

use crate::cli::output::{self, Styled};
use anyhow::{Context, Result};
use clap::Args;
use doc_cluster::config::{
    DEFAULT_CLUSTERS, DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_MAX_ITERATIONS,
    DEFAULT_SPARSIFY_THRESHOLD,
};
use doc_cluster::{
    read_document_ids, read_vecrep, write_assignments, ClusteringOutcome, FreezeReason, KMeans,
    KMeansConfig, WriteReport,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Arguments of the cluster command.
#[derive(Debug, Clone, Args)]
pub struct ClusterArgs {
    /// Vector representation file (`pageID sum_d f_i:occ_i ...`)
    #[arg(long)]
    pub vecrep: PathBuf,

    /// Requested document ids, one per line (extra columns ignored)
    #[arg(long)]
    pub training: PathBuf,

    /// Where to write `<documentID> <clusterID>` lines
    #[arg(long, short)]
    pub output: PathBuf,

    /// Number of clusters
    #[arg(long, short = 'k', default_value_t = DEFAULT_CLUSTERS)]
    pub clusters: usize,

    /// Convergence threshold on the largest centroid movement
    #[arg(long, default_value_t = DEFAULT_CONVERGENCE_THRESHOLD)]
    pub epsilon: f64,

    /// Drop averaged centroid entries at or below this magnitude
    #[arg(long, default_value_t = DEFAULT_SPARSIFY_THRESHOLD)]
    pub sparsify: f64,

    /// Stop after this many iterations even without convergence
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Feature dimension; inferred from the vecrep file when omitted
    #[arg(long)]
    pub features: Option<usize>,

    /// Also export the final centroids as JSON
    #[arg(long)]
    pub centroids: Option<PathBuf>,
}

impl ClusterArgs {
    fn config(&self) -> KMeansConfig {
        KMeansConfig {
            clusters: self.clusters,
            convergence_threshold: self.epsilon,
            sparsify_threshold: self.sparsify,
            max_iterations: self.max_iterations,
        }
    }
}

/// Run the cluster command.
///
/// Every output is rendered in memory first; nothing is written unless the
/// whole run succeeds.
pub fn run(args: &ClusterArgs) -> Result<()> {
    let s = Styled::new();
    let start = Instant::now();

    let engine = KMeans::new(args.config()).context("invalid clustering parameters")?;

    let file = File::open(&args.vecrep)
        .with_context(|| format!("opening {}", args.vecrep.display()))?;
    let documents = read_vecrep(BufReader::new(file), args.features)
        .with_context(|| format!("loading {}", args.vecrep.display()))?;
    info!(
        documents = documents.len(),
        dimension = documents.dimension(),
        "loaded document vectors"
    );

    let file = File::open(&args.training)
        .with_context(|| format!("opening {}", args.training.display()))?;
    let requested = read_document_ids(BufReader::new(file))
        .with_context(|| format!("reading {}", args.training.display()))?;

    let outcome = engine.run(&documents).context("clustering failed")?;

    let mut rendered = Vec::new();
    let report = write_assignments(&mut rendered, &requested, &outcome.inverse_assignment())?;

    let centroids_json = match &args.centroids {
        Some(_) => Some(serde_json::to_vec_pretty(&outcome.centroids)?),
        None => None,
    };

    // assignments last: a failed centroid export leaves no output
    if let (Some(path), Some(json)) = (&args.centroids, centroids_json) {
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    std::fs::write(&args.output, rendered)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let elapsed = start.elapsed();
    if output::is_json() {
        print_summary_json(args, &outcome, &report, documents.len(), elapsed);
    } else if !output::is_quiet() {
        print_summary(&s, args, &outcome, &report, documents.len(), elapsed);
    }

    Ok(())
}

/// Summary object printed in `--json` mode.
pub fn summary_json(
    args: &ClusterArgs,
    outcome: &ClusteringOutcome,
    report: &WriteReport,
    documents: usize,
    elapsed: Duration,
) -> serde_json::Value {
    serde_json::json!({
        "documents": documents,
        "config": args.config(),
        "state": outcome.state,
        "iterations": outcome.iterations,
        "max_delta": outcome.max_delta,
        "cluster_sizes": outcome.assignment.sizes(),
        "frozen_centroids": outcome.frozen,
        "final_cost": outcome.cost_history.last(),
        "assigned": report.assigned,
        "missing": report.missing,
        "output": args.output.display().to_string(),
        "duration_ms": elapsed.as_millis() as u64,
    })
}

fn print_summary_json(
    args: &ClusterArgs,
    outcome: &ClusteringOutcome,
    report: &WriteReport,
    documents: usize,
    elapsed: Duration,
) {
    output::print_json(&summary_json(args, outcome, report, documents, elapsed));
}

fn print_summary(
    s: &Styled,
    args: &ClusterArgs,
    outcome: &ClusteringOutcome,
    report: &WriteReport,
    documents: usize,
    elapsed: Duration,
) {
    output::print_header(s);

    let status = if outcome.converged() {
        format!("{} converged", s.ok_sym())
    } else {
        format!("{} stopped at iteration limit", s.warn_sym())
    };
    eprintln!(
        "  {status} after {} iterations in {}",
        outcome.iterations,
        s.yellow(&output::format_elapsed(elapsed))
    );
    eprintln!();
    eprintln!("  Documents:   {documents}");
    eprintln!("  Clusters:    {}", outcome.centroids.len());
    eprintln!("  Max delta:   {:.6}", outcome.max_delta);
    if let Some(cost) = outcome.cost_history.last() {
        eprintln!("  Cost:        {cost:.4}");
    }
    eprintln!();

    let sizes = outcome.assignment.sizes();
    eprintln!("  {}", s.bold("Cluster sizes"));
    for (cluster, &size) in sizes.iter().enumerate() {
        eprintln!(
            "    {:<4} {:>6}  {}",
            cluster,
            size,
            s.dim(&output::share_bar(size, documents, 20))
        );
    }

    if !outcome.frozen.is_empty() {
        eprintln!();
        eprintln!(
            "  {} {} centroids kept from the previous iteration",
            s.warn_sym(),
            outcome.frozen.len()
        );
        if output::is_verbose() {
            for event in &outcome.frozen {
                let reason = match event.reason {
                    FreezeReason::Empty => "empty",
                    FreezeReason::Degenerate => "zero-norm mean",
                };
                eprintln!(
                    "    iteration {:<4} cluster {:<4} {reason}",
                    event.iteration, event.cluster
                );
            }
        }
    }

    eprintln!();
    eprintln!(
        "  Wrote {} lines to {}",
        report.assigned + report.missing.len(),
        s.cyan(&args.output.display().to_string())
    );
    if !report.missing.is_empty() {
        eprintln!(
            "  {} {} requested ids had no vector and were written without a cluster",
            s.warn_sym(),
            report.missing.len()
        );
    }
}
