//! Run Context: per-invocation state shared by the pipeline steps
use crate::config::RunnerConfig;
use crate::namer::RunId;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    pub work_dir: PathBuf,
    pub settle_delay: Duration,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            run_id: RunId::generate(),
            work_dir: config.work_dir.clone(),
            settle_delay: config.settle_delay,
            started_at: Utc::now(),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.work_dir.join(self.run_id.data_file_name())
    }

    pub fn script_path(&self) -> PathBuf {
        self.work_dir.join(self.run_id.script_file_name())
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}
