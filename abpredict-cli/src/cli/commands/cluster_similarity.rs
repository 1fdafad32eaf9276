use crate::cli::output::{success, tree_item};
use abpredict_pipeline::workers::compare_clusters;
use abpredict_tools::ClinkerAligner;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ClusterSimilarityArgs {
    /// Source BGC (GenBank)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Target BGCs to compare the source against
    #[arg(value_name = "TARGET", required = true)]
    pub targets: Vec<PathBuf>,

    /// Output directory for the similarity CSV
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file
    #[arg(short, long, env = "ABPREDICT_CONFIG")]
    pub config: Option<PathBuf>,
}

pub fn run(args: ClusterSimilarityArgs) -> Result<()> {
    let config = super::load_effective_config(args.config.as_deref())?;
    let aligner = ClinkerAligner::from_config(&config.tools);

    let (csv_path, results) = compare_clusters(&aligner, &args.source, &args.targets, &args.output_dir)?;

    for (i, result) in results.iter().enumerate() {
        tree_item(
            i + 1 == results.len(),
            &result.target_bgc,
            Some(&format!("{:.4}", result.similarity)),
        );
    }
    success(&format!("Wrote {}", csv_path.display()));
    Ok(())
}
