use crate::cli::output::{info, success};
use abpredict_core::{
    default_config_path, describe_paths, generate_utc_timestamp, save_config, AbpredictError,
    Config,
};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file to show instead of the default one
    #[arg(short, long, env = "ABPREDICT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the default configuration to PATH (or the default location)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub init: Option<Option<PathBuf>>,

    /// Replace an existing file with --init, keeping a timestamped backup
    #[arg(long, requires = "init")]
    pub force: bool,

    /// Show the directories abpredict uses
    #[arg(long)]
    pub paths: bool,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    if args.paths {
        println!("{}", describe_paths());
        return Ok(());
    }

    if let Some(path) = args.init {
        let path = path.unwrap_or_else(default_config_path);
        if path.exists() && !args.force {
            return Err(AbpredictError::InvalidInput(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ))
            .into());
        }
        if path.exists() {
            let backup = path.with_extension(format!("toml.{}.bak", generate_utc_timestamp()));
            std::fs::rename(&path, &backup)?;
            info(&format!("Previous configuration moved to {}", backup.display()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        save_config(&path, &Config::default())?;
        success(&format!("Wrote default configuration to {}", path.display()));
        return Ok(());
    }

    let config = super::load_effective_config(args.config.as_deref())?;
    let text = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    if let Some(path) = &args.config {
        tracing::info!("Configuration from {}", path.display());
    }
    print!("{}", text);
    Ok(())
}
