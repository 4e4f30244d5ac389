//! Axum route handlers for the tool server.
//!
//! # Routes
//!
//! - `GET  /health`: Returns `{"status": "ok", "version": "...", "service": "spaceace"}`
//! - `GET  /tools`: Lists tool descriptors (name, description, args schema)
//! - `POST /invoke`: Accepts a `ToolCalling`, runs the tool

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::tools::{ToolCalling, ToolDescriptor, ToolRegistry};
use crate::utilities::errors::{ErrorKind, ToolError};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Read-only tool registry.
    pub registry: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/tools", get(list_tools_handler))
        .route("/invoke", post(invoke_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health: liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "spaceace",
    }))
}

/// GET /tools: everything the agent needs to pick a tool.
async fn list_tools_handler(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.registry.descriptors())
}

/// POST /invoke: run one tool call.
///
/// Request:  `{"tool_name": "...", "arguments": {...} | "..." }`
/// Response: `{"tool": "...", "result": ...}` on success, otherwise
/// `{"tool": "...", "error": "...", "kind": "..."}` with a status matching
/// the error kind.
async fn invoke_handler(
    State(state): State<AppState>,
    Json(calling): Json<ToolCalling>,
) -> (StatusCode, Json<Value>) {
    match state.registry.execute(&calling).await {
        Ok(result) => {
            tracing::info!(tool = %calling.tool_name, "tool call succeeded");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "tool": calling.tool_name,
                    "result": result,
                })),
            )
        }
        Err(err) => {
            tracing::warn!(tool = %calling.tool_name, kind = err.kind().as_str(), "tool call failed: {}", err);
            let mut body = err.to_value();
            body["tool"] = Value::String(calling.tool_name);
            (status_for(&err), Json(body))
        }
    }
}

fn status_for(err: &ToolError) -> StatusCode {
    match err.kind() {
        ErrorKind::UnknownCapability => StatusCode::NOT_FOUND,
        ErrorKind::MalformedPayload
        | ErrorKind::WrongShape
        | ErrorKind::MissingField
        | ErrorKind::InvalidField => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Exhausted => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::http::{Fetcher, HttpResponse, HttpTransport, TransportError};
    use crate::utilities::config::Settings;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Answers every request with the same status and body.
    struct FixedTransport(u16, &'static str);

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn get(
            &self,
            _url: &str,
            _query: &[(String, String)],
            _timeout: Duration,
        ) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(self.0, self.1))
        }
    }

    fn app(status: u16, body: &'static str) -> Router {
        let settings = Settings::default().with_retry(crate::http::RetryPolicy {
            max_attempts: 2,
            timeout: Duration::from_secs(1),
            retry_delay: Duration::ZERO,
        });
        let fetcher = Fetcher::new(Arc::new(FixedTransport(status, body)), settings.retry);
        let registry = ToolRegistry::from_catalog(CATALOG, Arc::new(settings), Arc::new(fetcher));
        app_router(AppState::new(registry))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn invoke_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/invoke")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(200, "{}").oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "spaceace");
    }

    #[tokio::test]
    async fn test_list_tools() {
        let request = Request::builder().uri("/tools").body(Body::empty()).unwrap();
        let response = app(200, "{}").oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let tools = json.as_array().unwrap();
        assert_eq!(tools.len(), CATALOG.len());
        assert_eq!(tools[0]["name"], "get_astros_tool");
        assert!(tools[0]["description"].as_str().unwrap().contains("humans in space"));
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let response = app(200, r#"{"message":"success","number":2}"#)
            .oneshot(invoke_request(serde_json::json!({"tool_name": "get_astros_tool"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["tool"], "get_astros_tool");
        assert_eq!(json["result"]["number"], 2);
    }

    #[tokio::test]
    async fn test_invoke_string_arguments() {
        let response = app(200, r#"{"current":{"temp_c":24}}"#)
            .oneshot(invoke_request(serde_json::json!({
                "tool_name": "fetch_weather",
                "arguments": "{\"latitude\": \"23.5\", \"longitude\": \"-45.3\"}",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["result"]["current"]["temp_c"], 24);
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let response = app(200, "{}")
            .oneshot(invoke_request(serde_json::json!({"tool_name": "unknown_tool", "arguments": {}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "unknown_capability");
        assert_eq!(json["tool"], "unknown_tool");
    }

    #[tokio::test]
    async fn test_invoke_missing_field() {
        let response = app(200, "{}")
            .oneshot(invoke_request(serde_json::json!({
                "tool_name": "fetch_weather",
                "arguments": {"latitude": "23.5"},
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "missing_field");
        assert!(json["error"].as_str().unwrap().contains("longitude"));
    }

    #[tokio::test]
    async fn test_invoke_exhausted() {
        let response = app(503, "maintenance")
            .oneshot(invoke_request(serde_json::json!({"tool_name": "get_iss_location_tool"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "exhausted");
        assert_eq!(json["attempts"], 2);
        assert_eq!(
            json["error"],
            "Failed to fetch ISS location after multiple attempts."
        );
    }
}
