use abpredict_pipeline::workers::MarkerAlignment;
use abpredict_pipeline::AlignmentEngine;
use abpredict_tools::BlastpSearch;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AlignMarkersArgs {
    /// Marker table of the query genome or cluster
    #[arg(value_name = "QUERY_TABLE")]
    pub query: PathBuf,

    /// Marker table of the target genome
    #[arg(value_name = "TARGET_TABLE")]
    pub target: PathBuf,

    /// Output directory for the alignment CSV and prefilter files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Only align against target markers of the same gene family
    #[arg(long)]
    pub filter: bool,

    /// Number of prefilter hits kept per query marker
    #[arg(long)]
    pub n_hits: Option<usize>,

    /// Configuration file
    #[arg(short, long, env = "ABPREDICT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Prints the mean best score on stdout
pub fn run(args: AlignMarkersArgs) -> Result<()> {
    let mut config = super::load_effective_config(args.config.as_deref())?;
    if let Some(n_hits) = args.n_hits {
        config.prefilter.n_hits = n_hits;
    }
    config.validate()?;

    let engine = AlignmentEngine::from_config(&config.alignment)?;
    let search = BlastpSearch::from_config(&config.tools);
    let alignment = MarkerAlignment {
        engine: &engine,
        search: &search,
        prefilter: &config.prefilter,
        family_filter: args.filter,
    };

    let report = alignment.run(&args.query, &args.target, &args.output_dir)?;
    tracing::info!(
        "Aligned {} query markers, results in {}",
        report.results.len(),
        report.csv_path.display()
    );

    println!("{}", report.mean_score);
    Ok(())
}
