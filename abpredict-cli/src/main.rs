use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use abpredict_core::AbpredictError;
use abpredict_pipeline::PipelineError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

/// `-v` wins over the environment; otherwise RUST_LOG, then ABPREDICT_LOG, then info
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => {
            let level = std::env::var("ABPREDICT_LOG").unwrap_or_else(|_| "info".to_string());
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
        }
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn core_exit_code(e: &AbpredictError) -> i32 {
    match e {
        AbpredictError::Configuration(_) => 2,
        AbpredictError::Io(_) | AbpredictError::InputMissing(_) => 3,
        AbpredictError::Parse(_) | AbpredictError::Serialization(_) => 4,
        _ => 1,
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<AbpredictError>() {
            return core_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<PipelineError>() {
            return match err {
                PipelineError::Core(inner) => core_exit_code(inner),
                PipelineError::Io(_) => 3,
                PipelineError::Csv(_) => 4,
                _ => 1,
            };
        }
    }
    1
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args),
        Commands::PredictFunction(args) => cli::commands::predict_function::run(args),
        Commands::AlignMarkers(args) => cli::commands::align_markers::run(args),
        Commands::ClusterSimilarity(args) => cli::commands::cluster_similarity::run(args),
        Commands::Status(args) => cli::commands::status::run(args),
        Commands::Config(args) => cli::commands::config::run(args),
    }
}
