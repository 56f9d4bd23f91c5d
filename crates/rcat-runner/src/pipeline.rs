//! Pipeline: validate → export → render → write artifacts → run → decode → clean up
use crate::artifacts::ArtifactPair;
use crate::decoder::decode_lines;
use crate::process::{run_runtime, translate};
use rcat_core::{
    normalize_expected, resolve_runtime, Method, Result, RunContext, RunReport,
    RunnerConfig, TabularSource, TestRequest, VariableBindings,
};
use rcat_script::ScriptEngine;
use std::path::Path;
use std::time::Instant;

/// Runs categorical tests. Holds no per-run state, so one pipeline can serve
/// concurrent callers.
pub struct Pipeline {
    engine: ScriptEngine,
    config: RunnerConfig,
}

impl Pipeline {
    pub fn new(engine: ScriptEngine, config: RunnerConfig) -> Self {
        Self { engine, config }
    }

    /// Pipeline over the built-in templates, or the file named in
    /// `config.templates_path`.
    pub fn from_config(config: RunnerConfig) -> Result<Self> {
        let engine = match &config.templates_path {
            Some(path) => ScriptEngine::from_file(path)?,
            None => ScriptEngine::builtin()?,
        };
        Ok(Self::new(engine, config))
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn execute(&self, request: &TestRequest) -> Result<Vec<String>> {
        self.execute_with_report(request).map(|report| report.lines)
    }

    pub fn execute_with_report(&self, request: &TestRequest) -> Result<RunReport> {
        self.run(
            &request.table,
            &request.method,
            &request.bindings,
            request.expected_probs.as_deref(),
            &request.runtime_path,
        )
    }

    /// Run one test and return the runtime's output lines.
    pub fn run_test(
        &self,
        table: &dyn TabularSource,
        method: &str,
        bindings: &VariableBindings,
        expected_probs: Option<&[f64]>,
        runtime_path: &Path,
    ) -> Result<Vec<String>> {
        self.run(table, method, bindings, expected_probs, runtime_path)
            .map(|report| report.lines)
    }

    fn run(
        &self,
        table: &dyn TabularSource,
        method: &str,
        bindings: &VariableBindings,
        expected_probs: Option<&[f64]>,
        runtime_path: &Path,
    ) -> Result<RunReport> {
        let start = Instant::now();

        // Everything that can be rejected is rejected before a file exists.
        let runtime = resolve_runtime(runtime_path)?;
        let method: Method = method.parse()?;
        let bindings = bindings.resolve(method)?;
        bindings.check_against(table)?;
        let expected = normalize_expected(expected_probs)?;
        if expected.is_some() && method != Method::GoodnessOfFit {
            tracing::warn!(%method, "expected probabilities only apply to chisq-gof; ignoring");
        }

        let ctx = RunContext::new(&self.config);
        let data = table.to_csv_bytes()?;
        let script = self.engine.render(
            method,
            &bindings,
            &ctx.run_id.data_file_name(),
            expected.as_deref(),
        )?;
        let script_digest = hash_bytes(script.text().as_bytes());

        tracing::info!(
            run_id = %ctx.run_id,
            %method,
            runtime = %runtime.display(),
            "starting categorical test"
        );

        let artifacts = ArtifactPair::create(&ctx, &data, script.text())?;
        let result = run_runtime(&runtime, artifacts.script_file_name(), ctx.work_dir());
        // Both files are gone before any outcome is reported.
        drop(artifacts);
        let result = result?;
        let exit_code = result.code;
        let stdout = translate(result, &runtime).inspect_err(|e| {
            tracing::warn!(run_id = %ctx.run_id, kind = e.kind(), "categorical test failed");
        })?;
        let lines = decode_lines(&stdout);

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            run_id = %ctx.run_id,
            %method,
            lines = lines.len(),
            elapsed_ms,
            "categorical test finished"
        );

        Ok(RunReport {
            run_id: ctx.run_id,
            method,
            script_digest,
            exit_code,
            started_at: ctx.started_at,
            elapsed_ms,
            lines,
        })
    }
}

fn hash_bytes(data: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(data))
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Convenience for one-off calls with the built-in templates.
pub fn run_test(
    table: &dyn TabularSource,
    method: &str,
    bindings: &VariableBindings,
    expected_probs: Option<&[f64]>,
    runtime_path: &Path,
) -> Result<Vec<String>> {
    Pipeline::from_config(RunnerConfig::default())?.run_test(
        table,
        method,
        bindings,
        expected_probs,
        runtime_path,
    )
}
