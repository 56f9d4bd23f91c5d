//! Runner configuration, read from `RCAT_*` environment variables.
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_RSCRIPT: &str = "RCAT_RSCRIPT";
pub const ENV_WORK_DIR: &str = "RCAT_WORK_DIR";
pub const ENV_SETTLE_MS: &str = "RCAT_SETTLE_MS";
pub const ENV_TEMPLATES: &str = "RCAT_TEMPLATES";

const DEFAULT_RSCRIPT: &str = "Rscript";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Runtime used when a request does not name one
    pub default_runtime: PathBuf,
    /// Where artifacts are written and the runtime is started
    pub work_dir: PathBuf,
    /// Pause between process exit and artifact deletion
    pub settle_delay: Duration,
    /// Replacement templates file
    pub templates_path: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_runtime: PathBuf::from(DEFAULT_RSCRIPT),
            work_dir: PathBuf::from("."),
            settle_delay: Duration::ZERO,
            templates_path: None,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_RSCRIPT) {
            config.default_runtime = PathBuf::from(path);
        }
        if let Some(dir) = get(ENV_WORK_DIR) {
            config.work_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_SETTLE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.settle_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(
                    key = ENV_SETTLE_MS,
                    value = %raw,
                    "ignoring invalid settle delay"
                ),
            }
        }
        config.templates_path = get(ENV_TEMPLATES).map(PathBuf::from);
        config
    }

    pub fn with_default_runtime(mut self, runtime: impl Into<PathBuf>) -> Self {
        self.default_runtime = runtime.into();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}
