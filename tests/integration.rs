//! Integration tests for the Faultline Server HTTP API.
//!
//! Each test starts a server on an ephemeral port and uses reqwest to
//! exercise the endpoints and the error boundary end to end.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use faultline_server::{AppState, HttpConfig};

/// Boots a Faultline server on an OS-assigned port.
/// Returns the base URL (e.g. "http://127.0.0.1:12345").
async fn spawn_server_with(config: HttpConfig) -> String {
    let state = AppState::new(&config);
    let app = faultline_server::router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{addr}")
}

async fn spawn_server() -> String {
    spawn_server_with(HttpConfig::default()).await
}

/// Asserts the body has exactly the wire error shape.
fn assert_error_shape(body: &Value) {
    let obj = body.as_object().expect("error body must be an object");
    assert_eq!(obj.len(), 3, "unexpected keys in {body}");
    assert!(obj["error_code"].is_string());
    assert!(obj["message"].is_string());
    assert!(obj["details"].is_object());
}

// ---------------------------------------------------------------------------
// Health & request IDs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["error_codes"], 22);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn request_id_generated_when_absent() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    let request_id = resp
        .headers()
        .get("x-request-id")
        .expect("missing x-request-id");
    // UUID format: 8-4-4-4-12
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn request_id_preserved_on_error_responses() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .get(format!("{base}/codes/NOT_A_CODE"))
        .header("x-request-id", "my-custom-id-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "my-custom-id-123"
    );
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn codes_registry_is_complete() {
    let base = spawn_server().await;
    let client = Client::new();

    let body: Value = client
        .get(format!("{base}/codes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let codes: Vec<&str> = body["codes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    for expected in [
        "UNKNOWN_ERROR",
        "CHAT_NOT_FOUND",
        "CHAT_ACCESS_DENIED",
        "CHAT_DAILY_LIMIT_EXCEEDED",
        "MESSAGE_NOT_FOUND",
        "USER_NOT_FOUND",
        "AUTH_INVALID_TOKEN",
        "SANDBOX_CREATE_FAILED",
        "SANDBOX_OPERATION_FAILED",
        "STORAGE_FILE_NOT_FOUND",
        "AI_SERVICE_ERROR",
        "API_KEY_MISSING",
        "SCHEDULER_TASK_NOT_FOUND",
        "SKILL_NOT_FOUND",
        "COMMAND_NOT_FOUND",
        "AGENT_NOT_FOUND",
        "MARKETPLACE_FETCH_FAILED",
        "MARKETPLACE_PLUGIN_NOT_FOUND",
        "MARKETPLACE_INSTALL_FAILED",
        "VALIDATION_ERROR",
        "RATE_LIMIT_EXCEEDED",
        "EXTERNAL_SERVICE_ERROR",
    ] {
        assert!(codes.contains(&expected), "missing {expected}");
    }
    assert_eq!(codes.len(), 22);
}

#[tokio::test]
async fn domain_defaults_keep_400_for_not_found() {
    let base = spawn_server().await;
    let client = Client::new();

    let body: Value = client
        .get(format!("{base}/domains"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let domains = body["domains"].as_array().unwrap();
    let chat = domains.iter().find(|d| d["domain"] == "chat").unwrap();
    assert_eq!(chat["default_code"], "CHAT_NOT_FOUND");
    assert_eq!(chat["default_status"], 400);
    let service = domains.iter().find(|d| d["domain"] == "service").unwrap();
    assert_eq!(service["default_code"], "UNKNOWN_ERROR");
    assert_eq!(service["default_status"], 500);
}

// ---------------------------------------------------------------------------
// Boundary translation scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auth_exception_scenario() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/errors/raise"))
        .json(&json!({"domain": "auth", "message": "token expired"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error_code": "AUTH_INVALID_TOKEN", "message": "token expired", "details": {}})
    );
}

#[tokio::test]
async fn chat_daily_limit_scenario() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/errors/raise"))
        .json(&json!({
            "domain": "chat",
            "message": "daily limit hit",
            "error_code": "CHAT_DAILY_LIMIT_EXCEEDED",
            "status_code": 429,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);

    let body: Value = resp.json().await.unwrap();
    assert_error_shape(&body);
    assert_eq!(body["error_code"], "CHAT_DAILY_LIMIT_EXCEEDED");
    assert!(body.get("status_code").is_none());
}

#[tokio::test]
async fn external_service_scenario() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/errors/raise"))
        .json(&json!({
            "domain": "external_service",
            "message": "upstream down",
            "service_name": "billing-api",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error_code"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(body["details"], json!({"service_name": "billing-api"}));
}

#[tokio::test]
async fn every_domain_default_round_trips() {
    let base = spawn_server().await;
    let client = Client::new();

    let table: Value = client
        .get(format!("{base}/domains"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for row in table["domains"].as_array().unwrap() {
        let mut req = json!({"domain": row["domain"], "message": "x"});
        if row["domain"] == "external_service" {
            req["service_name"] = json!("svc");
        }
        let resp = client
            .post(format!("{base}/errors/raise"))
            .json(&req)
            .send()
            .await
            .unwrap();
        assert_eq!(
            resp.status().as_u16(),
            row["default_status"].as_u64().unwrap() as u16
        );
        let body: Value = resp.json().await.unwrap();
        assert_error_shape(&body);
        assert_eq!(body["error_code"], row["default_code"]);
    }
}

#[tokio::test]
async fn service_name_rejected_outside_external_service() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/errors/raise"))
        .json(&json!({"domain": "sandbox", "message": "x", "service_name": "svc"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_error_shape(&body);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn oversized_request_id_is_replaced() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .get(format!("{base}/health"))
        .header("x-request-id", "r".repeat(300))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let request_id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn invalid_json_is_validation_error() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/errors/raise"))
        .header("content-type", "application/json")
        .body("{\"domain\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_error_shape(&body);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_route_is_well_formed() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .get(format!("{base}/does/not/exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_error_shape(&body);
    assert_eq!(body["error_code"], "UNKNOWN_ERROR");
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auth_required_when_configured() {
    let base = spawn_server_with(HttpConfig {
        auth_token: Some("test-secret".into()),
        ..HttpConfig::default()
    })
    .await;
    let client = Client::new();

    let resp = client.get(format!("{base}/codes")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_error_shape(&body);
    assert_eq!(body["error_code"], "AUTH_INVALID_TOKEN");

    let resp = client
        .get(format!("{base}/codes"))
        .bearer_auth("test-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Health stays exempt
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn rate_limit_when_configured() {
    let base = spawn_server_with(HttpConfig {
        rate_limit: 2,
        rate_limit_window: Duration::from_secs(60),
        ..HttpConfig::default()
    })
    .await;
    let client = Client::new();

    for _ in 0..2 {
        let resp = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 429);
    let body: Value = resp.json().await.unwrap();
    assert_error_shape(&body);
    assert_eq!(body["error_code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn openapi_json_documents_error_body() {
    let base = spawn_server().await;
    let client = Client::new();

    let resp = client
        .get(format!("{base}/api/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let doc: Value = resp.json().await.unwrap();
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/errors/raise"].is_object());
    let schemas = &doc["components"]["schemas"];
    assert!(schemas["ErrorBody"].is_object());
    assert!(schemas["ErrorCode"].is_object());
}
