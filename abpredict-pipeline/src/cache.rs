//! Idempotency guard for task output directories
//!
//! Under the `status` policy every task directory carries a small JSON record
//! (`.abpredict-status.json`) that is rewritten as the task moves from
//! `Running` to `Done` or `Failed`. Only `Done` counts as complete; anything
//! else is cleared and re-run. The `existence` policy treats any existing
//! directory as complete.

use crate::error::PipelineResult;
use abpredict_core::CachePolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const STATUS_FILE: &str = ".abpredict-status.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub label: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ResultCache {
    policy: CachePolicy,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl ResultCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn status_path(dir: &Path) -> PathBuf {
        dir.join(STATUS_FILE)
    }

    pub fn is_done(&self, dir: &Path) -> bool {
        match self.policy {
            CachePolicy::Existence => dir.is_dir(),
            CachePolicy::Status => match self.read_status(dir) {
                Ok(Some(record)) => record.status == TaskStatus::Done,
                Ok(None) => false,
                Err(e) => {
                    warn!("Unreadable status record in {}: {}", dir.display(), e);
                    false
                }
            },
        }
    }

    /// Current state of a task directory; `Pending` when nothing was recorded
    pub fn status_of(&self, dir: &Path) -> TaskStatus {
        match self.read_status(dir) {
            Ok(Some(record)) => record.status,
            _ => TaskStatus::Pending,
        }
    }

    pub fn read_status(&self, dir: &Path) -> PipelineResult<Option<StatusRecord>> {
        let path = Self::status_path(dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Prepare a clean directory for `label` and record it as running
    pub fn begin(&self, dir: &Path, label: &str) -> PipelineResult<()> {
        if dir.exists() {
            warn!("Re-running incomplete task {} in {}", label, dir.display());
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;

        let now = Utc::now();
        self.write_status(
            dir,
            &StatusRecord {
                label: label.to_string(),
                status: TaskStatus::Running,
                started_at: now,
                updated_at: now,
                error_message: None,
            },
        )
    }

    pub fn mark_done(&self, dir: &Path) -> PipelineResult<()> {
        self.update_status(dir, TaskStatus::Done, None)
    }

    pub fn mark_failed(&self, dir: &Path, error: &str) -> PipelineResult<()> {
        self.update_status(dir, TaskStatus::Failed, Some(error.to_string()))
    }

    fn update_status(
        &self,
        dir: &Path,
        status: TaskStatus,
        error_message: Option<String>,
    ) -> PipelineResult<()> {
        let now = Utc::now();
        let mut record = self.read_status(dir)?.unwrap_or_else(|| StatusRecord {
            label: dir.display().to_string(),
            status,
            started_at: now,
            updated_at: now,
            error_message: None,
        });
        record.status = status;
        record.updated_at = now;
        record.error_message = error_message;

        fs::create_dir_all(dir)?;
        self.write_status(dir, &record)
    }

    fn write_status(&self, dir: &Path, record: &StatusRecord) -> PipelineResult<()> {
        let path = Self::status_path(dir);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &path)?;
        debug!("{} -> {}", record.label, record.status);
        Ok(())
    }

    /// Every status record below `root`, sorted by directory
    pub fn scan(root: &Path) -> PipelineResult<Vec<(PathBuf, StatusRecord)>> {
        let pattern = format!(
            "{}/**/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            STATUS_FILE
        );
        let entries = glob::glob(&pattern).map_err(|e| {
            abpredict_core::AbpredictError::InvalidInput(format!("{}: {}", pattern, e))
        })?;

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let content = fs::read_to_string(&entry)?;
            match serde_json::from_str::<StatusRecord>(&content) {
                Ok(record) => {
                    let dir = entry.parent().map(Path::to_path_buf).unwrap_or_default();
                    records.push((dir, record));
                }
                Err(e) => warn!("Skipping unreadable {}: {}", entry.display(), e),
            }
        }
        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }
}
