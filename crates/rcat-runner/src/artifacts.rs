//! The data/script file pair owned by one run.
//!
//! Both files are created with `create_new`, so a run never writes into a file
//! another run already owns. Dropping the pair removes whatever was created,
//! on every exit path; removal problems are logged and otherwise ignored.

use rcat_core::{RcatError, Result, RunContext};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub struct ArtifactPair {
    data: PathBuf,
    script: PathBuf,
    created: Vec<PathBuf>,
    settle_delay: Duration,
}

impl ArtifactPair {
    /// Write `data` and `script` under the run's artifact names.
    pub fn create(ctx: &RunContext, data: &[u8], script: &str) -> Result<Self> {
        let mut pair = ArtifactPair {
            data: ctx.data_path(),
            script: ctx.script_path(),
            created: Vec::with_capacity(2),
            settle_delay: ctx.settle_delay,
        };
        let data_path = pair.data.clone();
        pair.write_new(&data_path, data)?;
        let script_path = pair.script.clone();
        pair.write_new(&script_path, script.as_bytes())?;
        Ok(pair)
    }

    fn write_new(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| RcatError::io(path, e))?;
        self.created.push(path.to_path_buf());
        file.write_all(contents)
            .and_then(|_| file.flush())
            .map_err(|e| RcatError::io(path, e))
    }

    pub fn data_path(&self) -> &Path {
        &self.data
    }

    pub fn script_path(&self) -> &Path {
        &self.script
    }

    /// Script file name relative to the work dir, as passed to the runtime.
    pub fn script_file_name(&self) -> &std::ffi::OsStr {
        self.script.file_name().unwrap_or(self.script.as_os_str())
    }
}

impl Drop for ArtifactPair {
    fn drop(&mut self) {
        if self.created.is_empty() {
            return;
        }
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        for path in self.created.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::trace!(path = %path.display(), "removed artifact"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to remove artifact"
                ),
            }
        }
    }
}
