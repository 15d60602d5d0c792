use clap::{Parser, Subcommand};
use doc_cluster_cli::cli::{self, cluster_cmd, vectorize_cmd};

/// Cluster documents as sparse feature vectors with k-means.
#[derive(Parser)]
#[command(name = "doc-cluster", version, about)]
struct Cli {
    /// Only print errors and warnings
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Print per-iteration detail
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print a JSON summary on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn a corpus into a vecrep file of feature counts
    Vectorize(vectorize_cmd::VectorizeArgs),
    /// Cluster the documents of a vecrep file
    Cluster(cluster_cmd::ClusterArgs),
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Read by the `cli::output` helpers.
    if args.quiet {
        std::env::set_var("DOC_CLUSTER_QUIET", "1");
    }
    if args.verbose {
        std::env::set_var("DOC_CLUSTER_VERBOSE", "1");
    }
    if args.json {
        std::env::set_var("DOC_CLUSTER_JSON", "1");
    }
    if args.no_color {
        std::env::set_var("DOC_CLUSTER_NO_COLOR", "1");
    }

    cli::init_tracing(args.verbose, args.quiet);

    match &args.command {
        Command::Vectorize(a) => vectorize_cmd::run(a),
        Command::Cluster(a) => cluster_cmd::run(a),
    }
}
