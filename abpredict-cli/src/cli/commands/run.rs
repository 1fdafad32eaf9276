use crate::cli::output::{info, section_header, success, tree_item};
use abpredict_core::{AbpredictError, CachePolicy};
use abpredict_pipeline::{discover_genomes, Collaborators, Orchestrator, StageSummary};
use abpredict_tools::command::require_program;
use abpredict_tools::Tool;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Data directory holding `antismash/` and `rgi/` inputs
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Glob matching the genome assemblies (quote it to stop the shell expanding it)
    #[arg(value_name = "GENOMES_GLOB")]
    pub genomes: String,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Number of workers, -1 uses every core
    #[arg(short = 'j', long, allow_negative_numbers = true)]
    pub ncpus: Option<i32>,

    /// Align against every target marker instead of the query's gene family only
    #[arg(long)]
    pub no_filter: bool,

    /// Number of prefilter hits kept per query marker
    #[arg(long)]
    pub n_hits: Option<usize>,

    /// When an existing task directory counts as done (status or existence)
    #[arg(long, value_name = "POLICY")]
    pub cache_policy: Option<CachePolicy>,

    /// Configuration file
    #[arg(short, long, env = "ABPREDICT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip checking that rgi, blastp and clinker are on PATH
    #[arg(long)]
    pub skip_tool_check: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut config = super::load_effective_config(args.config.as_deref())?;
    if let Some(ncpus) = args.ncpus {
        config.pipeline.ncpus = ncpus;
    }
    if args.no_filter {
        config.pipeline.family_filter = false;
    }
    if let Some(n_hits) = args.n_hits {
        config.prefilter.n_hits = n_hits;
    }
    if let Some(policy) = args.cache_policy {
        config.pipeline.cache_policy = policy;
    }
    config.validate()?;

    AbpredictError::require_exists(&args.data_dir)?;
    let genomes = discover_genomes(&args.genomes)?;
    if genomes.is_empty() {
        return Err(AbpredictError::InputMissing(PathBuf::from(&args.genomes)).into());
    }

    if !args.skip_tool_check {
        for tool in Tool::comparison_tools() {
            require_program(tool.program(&config.tools))
                .with_context(|| format!("{} is required for a full run", tool))?;
        }
    }

    section_header("Cross-genome comparison");
    info(&format!(
        "{} genomes, output in {}",
        genomes.len(),
        args.output_dir.display()
    ));

    let tools = Collaborators::from_config(&config.tools);
    let orchestrator = Orchestrator::new(config, &args.output_dir, tools)?;
    let summary = orchestrator.run(&args.data_dir, &genomes)?;

    print_stage("Marker detection", &summary.markers, false);
    print_stage("Cluster alignment", &summary.cluster_alignment, false);
    print_stage("Marker alignment", &summary.marker_alignment, true);
    success("All stages finished");
    Ok(())
}

fn print_stage(name: &str, summary: &StageSummary, is_last: bool) {
    tree_item(
        is_last,
        name,
        Some(&format!(
            "{} completed, {} already done",
            summary.completed, summary.skipped
        )),
    );
}
