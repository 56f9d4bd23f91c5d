//! Running the R runtime and translating how it exited.
use rcat_core::{ExecutionResult, RcatError, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Flag that makes Rscript skip site/user profiles and saved workspaces.
pub const VANILLA_FLAG: &str = "--vanilla";

/// Run `<runtime> --vanilla <script>` inside `work_dir` and capture its output.
///
/// Blocks until the process has exited, so the artifacts it reads are released
/// by the time this returns.
pub fn run_runtime(runtime: &Path, script: &OsStr, work_dir: &Path) -> Result<ExecutionResult> {
    tracing::debug!(
        runtime = %runtime.display(),
        script = %script.to_string_lossy(),
        work_dir = %work_dir.display(),
        "spawning runtime"
    );

    let output = Command::new(runtime)
        .arg(VANILLA_FLAG)
        .arg(script)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|child| child.wait_with_output())
        .map_err(|source| RcatError::Spawn {
            runtime: runtime.to_path_buf(),
            source,
        })?;

    Ok(ExecutionResult {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Non-zero exit (or death by signal) becomes `ExternalRuntimeFailure`
/// carrying the captured error stream. Successful runs yield their stdout.
pub fn translate(result: ExecutionResult, runtime: &Path) -> Result<String> {
    if result.success() {
        return Ok(result.stdout);
    }
    tracing::warn!(
        runtime = %runtime.display(),
        code = ?result.code,
        "runtime exited unsuccessfully"
    );
    Err(RcatError::ExternalRuntimeFailure {
        runtime: runtime.to_path_buf(),
        code: result.code,
        stderr: result.stderr.trim_end().to_string(),
    })
}
