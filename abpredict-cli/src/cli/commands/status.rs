use crate::cli::output::{empty, info, section_header, tree_item, warning};
use abpredict_core::AbpredictError;
use abpredict_pipeline::{ResultCache, TaskStatus};
use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output directory of a previous run
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// List every task instead of only unfinished ones
    #[arg(short, long)]
    pub all: bool,
}

pub fn run(args: StatusArgs) -> Result<()> {
    AbpredictError::require_exists(&args.output_dir)?;
    let records = ResultCache::scan(&args.output_dir)?;

    section_header(&format!("Task status in {}", args.output_dir.display()));
    if records.is_empty() {
        empty("No task records found");
        return Ok(());
    }

    let statuses = [
        TaskStatus::Done,
        TaskStatus::Running,
        TaskStatus::Failed,
        TaskStatus::Pending,
    ];
    for (i, status) in statuses.iter().enumerate() {
        let count = records.iter().filter(|(_, r)| r.status == *status).count();
        tree_item(i + 1 == statuses.len(), &status.to_string(), Some(&count.to_string()));
    }

    let listed: Vec<_> = records
        .iter()
        .filter(|(_, r)| args.all || r.status != TaskStatus::Done)
        .collect();
    if listed.is_empty() {
        info(&format!("All {} tasks done", records.len()));
        return Ok(());
    }

    section_header("Tasks");
    for (i, (dir, record)) in listed.iter().enumerate() {
        let status = match record.status {
            TaskStatus::Done => record.status.to_string().green(),
            TaskStatus::Failed => record.status.to_string().red(),
            _ => record.status.to_string().yellow(),
        };
        tree_item(
            i + 1 == listed.len(),
            &record.label,
            Some(&format!("{} ({})", status, dir.display())),
        );
        if let Some(message) = &record.error_message {
            println!("     {}", message.dimmed());
        }
    }

    let failed = records
        .iter()
        .filter(|(_, r)| r.status == TaskStatus::Failed)
        .count();
    if failed > 0 {
        warning(&format!("{} failed tasks will be re-run on the next run", failed));
    }
    Ok(())
}
