//! CLI subcommand implementations for the doc-cluster binary.

pub mod cluster_cmd;
pub mod output;
pub mod vectorize_cmd;

use tracing_subscriber::EnvFilter;

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `--verbose` and
/// `--quiet`.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "doc_cluster={default_level},doc_cluster_cli={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
