use crate::cli::output::{info, section_header, success, tree_item};
use abpredict_core::{AbpredictError, CachePolicy};
use abpredict_pipeline::{discover_genomes, Collaborators, Orchestrator};
use abpredict_tools::command::require_program;
use abpredict_tools::Tool;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PredictFunctionArgs {
    /// Glob matching the genome assemblies (quote it to stop the shell expanding it)
    #[arg(value_name = "GENOMES_GLOB")]
    pub genomes: String,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Predict without sequence similarity network features
    #[arg(long)]
    pub no_ssn: bool,

    /// Number of workers, -1 uses every core
    #[arg(short = 'j', long, allow_negative_numbers = true)]
    pub ncpus: Option<i32>,

    /// When an existing task directory counts as done (status or existence)
    #[arg(long, value_name = "POLICY")]
    pub cache_policy: Option<CachePolicy>,

    /// Configuration file
    #[arg(short, long, env = "ABPREDICT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip checking that the predictor program is on PATH
    #[arg(long)]
    pub skip_tool_check: bool,
}

pub fn run(args: PredictFunctionArgs) -> Result<()> {
    let mut config = super::load_effective_config(args.config.as_deref())?;
    if let Some(ncpus) = args.ncpus {
        config.pipeline.ncpus = ncpus;
    }
    if args.no_ssn {
        config.pipeline.no_ssn = true;
    }
    if let Some(policy) = args.cache_policy {
        config.pipeline.cache_policy = policy;
    }
    config.validate()?;

    let genomes = discover_genomes(&args.genomes)?;
    if genomes.is_empty() {
        return Err(AbpredictError::InputMissing(PathBuf::from(&args.genomes)).into());
    }

    if !args.skip_tool_check {
        let tool = Tool::Predictor;
        require_program(tool.program(&config.tools))
            .with_context(|| format!("{} is required for function prediction", tool))?;
    }

    section_header("BGC function prediction");
    info(&format!(
        "{} genomes, output in {}",
        genomes.len(),
        args.output_dir.display()
    ));

    let tools = Collaborators::from_config(&config.tools);
    let orchestrator = Orchestrator::new(config, &args.output_dir, tools)?;
    let summary = orchestrator.predict_functions(&genomes)?;

    tree_item(
        true,
        "Function prediction",
        Some(&format!(
            "{} completed, {} already done",
            summary.completed, summary.skipped
        )),
    );
    success("Predictions written");
    Ok(())
}
