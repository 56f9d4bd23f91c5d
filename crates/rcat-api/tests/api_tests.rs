use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rcat_api::{create_app, handlers::AppState};
use rcat_core::RunnerConfig;
use rcat_runner::Pipeline;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(work: &TempDir, runtime: &Path) -> Router {
    let config = RunnerConfig::default()
        .with_work_dir(work.path())
        .with_default_runtime(runtime);
    let pipeline = Pipeline::from_config(config).unwrap();
    create_app(AppState {
        pipeline: Arc::new(pipeline),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_test(body: Value) -> Request<Body> {
    Request::post("/v1/tests")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn table() -> Value {
    json!({
        "columns": ["before", "after"],
        "rows": [["Yes", "Yes"], ["Yes", "No"], ["No", "No"], ["No", "Yes"]]
    })
}

#[tokio::test]
async fn health_reports_version() {
    let work = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&work, Path::new("Rscript")), Request::get("/v1/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], rcat_core::RCAT_VERSION);
}

#[tokio::test]
async fn methods_lists_all_four() {
    let work = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&work, Path::new("Rscript")), Request::get("/v1/methods").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["chisq-gof", "chisq-assoc", "mcnemar", "fisher"]);
    assert_eq!(body["methods"][0]["paired"], false);
}

#[tokio::test]
async fn missing_runtime_is_service_unavailable() {
    let work = tempfile::tempdir().unwrap();
    let missing = work.path().join("no-such-Rscript");
    let (status, body) = send(
        app(&work, &missing),
        post_test(json!({
            "method": "mcnemar",
            "table": table(),
            "row_var": "before",
            "col_var": "after",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["kind"], "runtime_not_found");
}

#[tokio::test]
async fn unknown_method_is_bad_request() {
    let work = tempfile::tempdir().unwrap();
    // The runtime has to exist for method validation to be reached.
    let runtime = work.path().join("Rscript");
    std::fs::write(&runtime, "").unwrap();
    let (status, body) = send(
        app(&work, &runtime),
        post_test(json!({
            "method": "anova",
            "table": table(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_method");
    assert!(body["error"]["message"].as_str().unwrap().contains("anova"));
}

#[cfg(unix)]
mod with_fake_runtime {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn fake_runtime(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("Rscript");
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn successful_run_returns_report() {
        let work = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let runtime = fake_runtime(&bin, "#!/bin/sh\necho \"McNemar's chi-squared = 0\"\n");
        let (status, body) = send(
            app(&work, &runtime),
            post_test(json!({
                "method": "mcnemar",
                "table": table(),
                "row_var": "before",
                "col_var": "after",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "mcnemar");
        assert_eq!(body["exit_code"], 0);
        assert_eq!(body["lines"], json!(["McNemar's chi-squared = 0"]));
        assert_eq!(body["run_id"].as_str().unwrap().len(), 8);
        assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn runtime_failure_is_bad_gateway_with_stderr() {
        let work = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let runtime = fake_runtime(
            &bin,
            "#!/bin/sh\necho \"Error in library(vcd) : there is no package called 'vcd'\" >&2\nexit 1\n",
        );
        let (status, body) = send(
            app(&work, &runtime),
            post_test(json!({
                "method": "chisq-assoc",
                "table": table(),
                "row_var": "before",
                "col_var": "after",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["kind"], "external_runtime_failure");
        assert!(body["error"]["stderr"].as_str().unwrap().contains("no package called 'vcd'"));
    }

    #[tokio::test]
    async fn missing_binding_is_bad_request() {
        let work = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let runtime = fake_runtime(&bin, "#!/bin/sh\nexit 0\n");
        let (status, body) = send(
            app(&work, &runtime),
            post_test(json!({
                "method": "fisher",
                "table": table(),
                "row_var": "before",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "invalid_request");
    }

    #[tokio::test]
    async fn request_body_cannot_choose_the_executable() {
        let work = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let configured = fake_runtime(&bin, "#!/bin/sh\necho configured\n");
        let other = bin.path().join("other");
        std::fs::write(&other, "#!/bin/sh\necho chosen-by-client\n").unwrap();
        std::fs::set_permissions(&other, std::fs::Permissions::from_mode(0o755)).unwrap();

        for named in [other.clone(), PathBuf::from("/bin/echo")] {
            let (status, body) = send(
                app(&work, &configured),
                post_test(json!({
                    "method": "fisher",
                    "table": table(),
                    "row_var": "before",
                    "col_var": "after",
                    "rscript": named,
                    "runtime_path": named,
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["lines"], json!(["configured"]));
        }
    }
}
