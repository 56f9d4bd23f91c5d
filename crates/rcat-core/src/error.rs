//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcatError {
    #[error("RUNTIME/NOT_FOUND: no runtime executable at {}", .path.display())]
    RuntimeNotFound { path: PathBuf },

    #[error("METHOD/INVALID: '{0}' is not a supported method (expected one of chisq-gof, chisq-assoc, mcnemar, fisher)")]
    InvalidMethod(String),

    #[error("RUNTIME/EXIT: {} exited with {}: {stderr}", .runtime.display(), display_code(.code))]
    ExternalRuntimeFailure {
        runtime: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("REQUEST/{0}")]
    InvalidRequest(String),

    #[error("EXPORT/{0}")]
    Export(String),

    #[error("RENDER/{0}")]
    Render(String),

    #[error("RUNTIME/SPAWN: failed to start {}: {source}", .runtime.display())]
    Spawn {
        runtime: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO/{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RcatError {
    /// Stable short code, used as a log field and in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RuntimeNotFound { .. } => "runtime_not_found",
            Self::InvalidMethod(_) => "invalid_method",
            Self::ExternalRuntimeFailure { .. } => "external_runtime_failure",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Export(_) => "export",
            Self::Render(_) => "render",
            Self::Spawn { .. } => "spawn",
            Self::Io { .. } => "io",
        }
    }

    /// Whether the caller can fix the failure by changing the request.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidMethod(_) | Self::InvalidRequest(_))
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RcatError>;
