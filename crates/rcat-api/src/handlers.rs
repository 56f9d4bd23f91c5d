//! API Handlers
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rcat_core::{DataTable, Method, RcatError, RunReport, TestRequest, VariableBindings};
use rcat_runner::Pipeline;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Body of `POST /v1/tests`. The runtime is not part of it: the server always
/// runs the configured `default_runtime`.
#[derive(Debug, Deserialize)]
pub struct TestBody {
    pub method: String,
    pub table: DataTable,
    #[serde(flatten)]
    pub bindings: VariableBindings,
    #[serde(default)]
    pub expected_probs: Option<Vec<f64>>,
}

impl TestBody {
    fn into_request(self, runtime: &Path) -> TestRequest {
        TestRequest {
            method: self.method,
            table: self.table,
            bindings: self.bindings,
            expected_probs: self.expected_probs,
            runtime_path: runtime.to_path_buf(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Run(RcatError),
    /// The blocking task panicked or was cancelled.
    Worker(String),
}

impl From<RcatError> for ApiError {
    fn from(err: RcatError) -> Self {
        ApiError::Run(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Run(err) => {
                let status = match &err {
                    e if e.is_caller_error() => StatusCode::BAD_REQUEST,
                    RcatError::RuntimeNotFound { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    RcatError::ExternalRuntimeFailure { .. } => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let mut error = json!({ "kind": err.kind(), "message": err.to_string() });
                if let RcatError::ExternalRuntimeFailure { stderr, .. } = &err {
                    error["stderr"] = Value::String(stderr.clone());
                }
                (status, json!({ "error": error }))
            }
            ApiError::Worker(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": { "kind": "internal", "message": message } }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn run_test(
    State(state): State<AppState>,
    Json(body): Json<TestBody>,
) -> Result<Json<RunReport>, ApiError> {
    let pipeline = Arc::clone(&state.pipeline);
    let request = body.into_request(&pipeline.config().default_runtime);

    // The runner blocks on the child process.
    let report = tokio::task::spawn_blocking(move || pipeline.execute_with_report(&request))
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))??;
    Ok(Json(report))
}

pub async fn list_methods() -> (StatusCode, Json<Value>) {
    let methods: Vec<Value> = Method::ALL
        .iter()
        .map(|m| {
            json!({
                "name": m.name(),
                "description": m.description(),
                "paired": m.uses_paired_variables(),
            })
        })
        .collect();
    (StatusCode::OK, Json(json!({ "methods": methods })))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": rcat_core::RCAT_VERSION })),
    )
}
