//! `doc-cluster vectorize` — turn a corpus into a vecrep file.

use crate::cli::output::{self, Styled};
use anyhow::{Context, Result};
use clap::Args;
use doc_cluster::vectorize::{load_stopwords, parse_collection, FeatureDictionary, Vectorizer};
use doc_cluster::write_vecrep;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments of the vectorize command.
#[derive(Debug, Clone, Args)]
pub struct VectorizeArgs {
    /// Stop-word list, one word per line
    #[arg(long)]
    pub stopwords: PathBuf,

    /// Corpus with `<id>`, `<title>` and `<text>` blocks
    #[arg(long)]
    pub collection: PathBuf,

    /// Feature list, one term per line (line number = feature index)
    #[arg(long)]
    pub features: PathBuf,

    /// Where to write the vecrep file
    #[arg(long, short)]
    pub output: PathBuf,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Run the vectorize command.
pub fn run(args: &VectorizeArgs) -> Result<()> {
    let s = Styled::new();
    let start = Instant::now();

    let stopwords = load_stopwords(open(&args.stopwords)?)
        .with_context(|| format!("reading {}", args.stopwords.display()))?;
    let features = FeatureDictionary::from_reader(open(&args.features)?)
        .with_context(|| format!("reading {}", args.features.display()))?;
    let collection = parse_collection(open(&args.collection)?)
        .with_context(|| format!("parsing {}", args.collection.display()))?;

    let vectorizer = Vectorizer::new(stopwords, features);
    let records = vectorizer
        .vectorize(&collection)
        .with_context(|| format!("vectorizing {}", args.collection.display()))?;

    let mut rendered = Vec::new();
    write_vecrep(&mut rendered, &records)?;
    std::fs::write(&args.output, rendered)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let featureless = records.iter().filter(|r| r.counts.is_empty()).count();
    let elapsed = start.elapsed();

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "documents": records.len(),
            "dimension": vectorizer.dimension(),
            "featureless": featureless,
            "output": args.output.display().to_string(),
            "duration_ms": elapsed.as_millis() as u64,
        }));
    } else if !output::is_quiet() {
        eprintln!(
            "  {} Vectorized {} documents over {} features in {}",
            s.ok_sym(),
            records.len(),
            vectorizer.dimension(),
            s.yellow(&output::format_elapsed(elapsed)),
        );
        if featureless > 0 {
            eprintln!(
                "  {} {featureless} documents contain no features and cannot be clustered",
                s.warn_sym()
            );
        }
        eprintln!("  Wrote {}", s.cyan(&args.output.display().to_string()));
    }

    Ok(())
}
