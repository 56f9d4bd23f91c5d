//! Data Model: Method, TestRequest, ExecutionResult, RunReport
use crate::error::{RcatError, Result};
use crate::namer::RunId;
use crate::table::{DataTable, TabularSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The closed set of supported categorical tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "chisq-gof")]
    GoodnessOfFit,
    #[serde(rename = "chisq-assoc")]
    Association,
    #[serde(rename = "mcnemar")]
    McNemar,
    #[serde(rename = "fisher")]
    Fisher,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::GoodnessOfFit,
        Method::Association,
        Method::McNemar,
        Method::Fisher,
    ];

    /// Wire name, also the name of the script template.
    pub fn name(self) -> &'static str {
        match self {
            Method::GoodnessOfFit => "chisq-gof",
            Method::Association => "chisq-assoc",
            Method::McNemar => "mcnemar",
            Method::Fisher => "fisher",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Method::GoodnessOfFit => "Chi-square goodness-of-fit test with Cohen's W",
            Method::Association => {
                "Chi-square test of association with G-test, effect sizes and Bonferroni posthoc"
            }
            Method::McNemar => "McNemar's test for paired 2x2 data with Cohen's g",
            Method::Fisher => "Fisher's exact test (simulated p-value beyond 2x2)",
        }
    }

    pub fn uses_paired_variables(self) -> bool {
        !matches!(self, Method::GoodnessOfFit)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = RcatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chisq-gof" => Ok(Method::GoodnessOfFit),
            "chisq-assoc" => Ok(Method::Association),
            "mcnemar" => Ok(Method::McNemar),
            "fisher" => Ok(Method::Fisher),
            _ => Err(RcatError::InvalidMethod(s.to_string())),
        }
    }
}

/// Variable names as supplied by the caller. Which ones are required
/// depends on the method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBindings {
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub row_var: Option<String>,
    #[serde(default)]
    pub col_var: Option<String>,
}

impl VariableBindings {
    pub fn single(variable: impl Into<String>) -> Self {
        Self {
            variable: Some(variable.into()),
            ..Self::default()
        }
    }

    pub fn paired(row_var: impl Into<String>, col_var: impl Into<String>) -> Self {
        Self {
            variable: None,
            row_var: Some(row_var.into()),
            col_var: Some(col_var.into()),
        }
    }

    /// Pick the bindings `method` needs, failing on missing or empty names.
    pub fn resolve(&self, method: Method) -> Result<ResolvedBindings> {
        if method.uses_paired_variables() {
            let row = required(&self.row_var, "row_var", method)?;
            let col = required(&self.col_var, "col_var", method)?;
            Ok(ResolvedBindings::Paired { row, col })
        } else {
            let variable = required(&self.variable, "variable", method)?;
            Ok(ResolvedBindings::Single { variable })
        }
    }
}

fn required(value: &Option<String>, field: &str, method: Method) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(RcatError::InvalidRequest(format!(
            "method {method} requires a non-empty '{field}' binding"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBindings {
    Single { variable: String },
    Paired { row: String, col: String },
}

impl ResolvedBindings {
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ResolvedBindings::Single { variable } => vec![variable.as_str()],
            ResolvedBindings::Paired { row, col } => vec![row.as_str(), col.as_str()],
        }
    }

    /// Every bound name must be a column of `table`.
    pub fn check_against(&self, table: &dyn TabularSource) -> Result<()> {
        let columns = table.column_names();
        for name in self.columns() {
            if !columns.iter().any(|c| c == name) {
                return Err(RcatError::InvalidRequest(format!(
                    "column '{name}' not found in input table (columns: {})",
                    columns.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Expected probabilities for goodness-of-fit; empty counts as absent.
pub fn normalize_expected(probs: Option<&[f64]>) -> Result<Option<Vec<f64>>> {
    let Some(probs) = probs.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    if let Some(bad) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(RcatError::InvalidRequest(format!(
            "expected probabilities must be finite and non-negative, got {bad}"
        )));
    }
    Ok(Some(probs.to_vec()))
}

/// One test invocation as a caller describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequest {
    /// Method name, validated when the request is executed
    pub method: String,
    /// Input data
    pub table: DataTable,
    #[serde(flatten)]
    pub bindings: VariableBindings,
    /// Goodness-of-fit only
    #[serde(default)]
    pub expected_probs: Option<Vec<f64>>,
    /// Path to the Rscript executable
    pub runtime_path: PathBuf,
}

/// What one runtime process produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub method: Method,
    /// blake3 digest of the rendered script
    pub script_digest: String,
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub lines: Vec<String>,
}
