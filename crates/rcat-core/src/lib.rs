//! rcat Core: data model, error taxonomy and run context
//!
//! Shared vocabulary for the script engine, the runner and the HTTP driver.

pub mod config;
pub mod context;
pub mod data_model;
pub mod error;
pub mod namer;
pub mod runtime;
pub mod table;

pub use config::RunnerConfig;
pub use context::RunContext;
pub use data_model::{
    normalize_expected, ExecutionResult, Method, ResolvedBindings, RunReport, TestRequest,
    VariableBindings,
};
pub use error::{RcatError, Result};
pub use namer::RunId;
pub use runtime::resolve_runtime;
pub use table::{DataTable, TabularSource};

/// rcat version
pub const RCAT_VERSION: &str = env!("CARGO_PKG_VERSION");
