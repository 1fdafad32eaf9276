pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "abpredict",
    version,
    about = "Cross-genome comparison of resistance markers and biosynthetic gene clusters",
    long_about = "abpredict detects resistance markers in each genome, aligns every biosynthetic \
                  gene cluster against the clusters of every other genome, and scores every \
                  cluster's resistance markers against the markers found in the other genomes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run marker detection, cluster alignment and marker alignment for all genomes
    Run(commands::run::RunArgs),

    /// Predict the function of the BGCs in every genome
    PredictFunction(commands::predict_function::PredictFunctionArgs),

    /// Align the markers of one table against another
    AlignMarkers(commands::align_markers::AlignMarkersArgs),

    /// Cluster similarity of one BGC against one or more others
    ClusterSimilarity(commands::cluster_similarity::ClusterSimilarityArgs),

    /// Summarise task status records in an output directory
    Status(commands::status::StatusArgs),

    /// Show or initialise the configuration
    Config(commands::config::ConfigArgs),
}
