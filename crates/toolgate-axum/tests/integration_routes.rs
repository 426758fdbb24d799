//! Router tests: each route is wired to its service and honours the
//! 200-for-business-failures contract.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{FakeCli, context};
use toolgate_axum::{CorsConfig, create_router};

fn app(cli: Arc<FakeCli>) -> axum::Router {
    create_router(context(cli), &CorsConfig::AllowAll)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn status_reports_authenticated_identity() {
    let response = app(Arc::new(FakeCli::logged_in()))
        .oneshot(get("/status"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json,
        json!({
            "isInstalled": true,
            "isAuthenticated": true,
            "version": "2.40.0",
            "identity": {"login": "alice", "displayName": "Alice A"}
        })
    );
}

#[tokio::test]
async fn status_reports_not_installed() {
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(get("/status"))
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["isInstalled"], false);
    assert_eq!(json["isAuthenticated"], false);
    assert_eq!(json["error"], "exited with status 1");
}

#[tokio::test]
async fn exec_rejection_is_200_and_spawns_nothing() {
    let cli = Arc::new(FakeCli::default());
    let response = app(cli.clone())
        .oneshot(post_json(
            "/exec",
            &json!({"command": "extension", "args": ["install", "evil"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["output"], "");
    assert_eq!(json["command"], "extension install evil");
    assert!(json["error"].as_str().unwrap().contains("not allowed"));
    assert_eq!(cli.call_count(), 0);
}

#[tokio::test]
async fn exec_runs_allowed_command() {
    let cli = Arc::new(FakeCli::default().with("repo list --limit 1", "cli/cli"));
    let response = app(cli)
        .oneshot(post_json(
            "/exec",
            &json!({"command": "repo list", "args": ["--limit", "1"]}),
        ))
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(
        json,
        json!({"success": true, "command": "repo list --limit 1", "output": "cli/cli"})
    );
}

#[tokio::test]
async fn exec_process_failure_is_200() {
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(post_json("/exec", &json!({"command": "issue list"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn exec_malformed_body_is_client_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/exec")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(request)
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn exec_wrong_method_is_rejected() {
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(get("/exec"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn config_returns_discovered_tools_and_availability_follows() {
    let router = app(Arc::new(FakeCli::default()));
    let config = json!({
        "github": {"transportType": "stdio", "executablePath": "npx", "args": ["-y", "server-github"]}
    });

    let response = router
        .clone()
        .oneshot(post_json("/config", &config))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"github": [{"name": "ping"}]})
    );

    let response = router.oneshot(get("/availability")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"github": [{"name": "ping"}]})
    );
}

#[tokio::test]
async fn invalid_config_is_400_with_error_body() {
    let config = json!({"bad": {"executablePath": "npx -y server"}});
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(post_json("/config", &config))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("bad"));
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/status")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app(Arc::new(FakeCli::default()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
