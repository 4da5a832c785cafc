//! HTTP endpoints for the coach.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::CoachError;
use crate::flow::http::{LEGACY_NEXT_QUESTION_PATH, NEXT_QUESTION_PATH, START_SESSION_PATH};
use crate::flow::{NextQuestionRequest, StartSessionRequest};
use crate::render;

use super::service::CoachService;

/// Shared state for coach routes.
#[derive(Clone)]
pub struct CoachRouteState {
    pub service: Arc<CoachService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResolutionRequest {
    #[serde(default)]
    thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RenderResolutionRequest {
    #[serde(default)]
    markdown: Option<String>,
}

/// Build the coach routes.
pub fn coach_routes(service: Arc<CoachService>) -> Router {
    let state = CoachRouteState { service };

    Router::new()
        .route("/health", get(health))
        .route(START_SESSION_PATH, post(start_session))
        .route(NEXT_QUESTION_PATH, post(next_question))
        .route(LEGACY_NEXT_QUESTION_PATH, post(next_question))
        .route("/generate-resolution", post(generate_resolution))
        .route("/render-resolution", post(render_resolution))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health(State(state): State<CoachRouteState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "resolution-coach",
        "model": state.service.model_name(),
        "activeSessions": state.service.threads().len().await,
    }))
}

// ── Session ─────────────────────────────────────────────────────────────

async fn start_session(
    State(state): State<CoachRouteState>,
    body: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response("start_session", invalid_body(rejection)),
    };
    match state.service.start_session(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response("start_session", e),
    }
}

/// Served on both the current and the legacy path.
async fn next_question(
    State(state): State<CoachRouteState>,
    body: Result<Json<NextQuestionRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response("get_next_question", invalid_body(rejection)),
    };
    match state.service.next_question(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response("get_next_question", e),
    }
}

// ── Resolution ──────────────────────────────────────────────────────────

async fn generate_resolution(
    State(state): State<CoachRouteState>,
    body: Result<Json<GenerateResolutionRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response("generate_resolution", invalid_body(rejection)),
    };
    let Some(thread_id) = request.thread_id.filter(|id| !id.trim().is_empty()) else {
        return error_response("generate_resolution", CoachError::MissingThreadId);
    };
    match state.service.generate_resolution(&thread_id).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response("generate_resolution", e),
    }
}

async fn render_resolution(body: Result<Json<RenderResolutionRequest>, JsonRejection>) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response("render_resolution", invalid_body(rejection)),
    };
    let Some(markdown) = request.markdown.filter(|m| !m.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "No markdown text provided"})),
        )
            .into_response();
    };
    let html = render::render(&markdown).to_html();
    Json(serde_json::json!({ "html": html })).into_response()
}

// ── Errors ──────────────────────────────────────────────────────────────

fn status_for(error: &CoachError) -> StatusCode {
    match error {
        CoachError::MissingThreadId | CoachError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        CoachError::ThreadNotFound(_) => StatusCode::NOT_FOUND,
        CoachError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        CoachError::EmptyResolution | CoachError::EmptyQuestion | CoachError::Llm(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Bodies that are not JSON, or do not fit the request type, still get an
/// `{error}` body.
fn invalid_body(rejection: JsonRejection) -> CoachError {
    CoachError::InvalidRequest(rejection.body_text())
}

fn error_response(endpoint: &str, error: CoachError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!(endpoint = endpoint, status = %status, error = %error, "Request failed");
    } else {
        warn!(endpoint = endpoint, status = %status, error = %error, "Request rejected");
    }
    (status, Json(serde_json::json!({"error": error.to_string()}))).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::coach::test_support::StubLlm;
    use crate::coach::{CoachConfig, ThreadStore};

    fn app(llm: StubLlm) -> Router {
        let service = CoachService::new(Arc::new(llm), ThreadStore::new(), CoachConfig::default());
        coach_routes(Arc::new(service))
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn start_session_returns_question() {
        let (status, body) = post_json(
            app(StubLlm::with_replies(["[YES/NO] Do you exercise weekly?"])),
            "/start_session",
            serde_json::json!({
                "name": "Ana",
                "location": "Rome",
                "resolutionType": "Health & Fitness",
                "specificResolution": "Start a Consistent Exercise Routine"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "[YES/NO] Do you exercise weekly?");
        assert_eq!(body["questionNumber"], 1);
        assert!(body["threadId"].as_str().unwrap().starts_with("thread_"));
    }

    #[tokio::test]
    async fn missing_thread_id_is_bad_request() {
        let (status, body) = post_json(
            app(StubLlm::default()),
            "/get_next_question",
            serde_json::json!({"answer": "Yes", "questionNumber": 0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Thread ID is required");
    }

    #[tokio::test]
    async fn unknown_thread_is_not_found_on_legacy_path() {
        let (status, body) = post_json(
            app(StubLlm::default()),
            "/submit_answer",
            serde_json::json!({"threadId": "thread_gone", "answer": "Yes", "questionNumber": 0}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("thread_gone"));
    }

    #[tokio::test]
    async fn llm_failure_is_server_error() {
        let llm = StubLlm::default();
        llm.replies
            .lock()
            .unwrap()
            .push_back(Err(crate::error::LlmError::AuthFailed {
                provider: "stub".to_string(),
            }));
        let (status, body) = post_json(
            app(llm),
            "/start_session",
            serde_json::json!({"name": "Ana"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_gets_json_error() {
        let (status, body) = post_json(
            app(StubLlm::default()),
            "/get_next_question",
            serde_json::json!({"threadId": "thread_x", "answer": "Yes", "questionNumber": -1}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

        let response = app(StubLlm::default())
            .oneshot(
                Request::post("/start_session")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_content_type_gets_json_error() {
        let response = app(StubLlm::default())
            .oneshot(
                Request::post("/render-resolution")
                    .body(Body::from(r###"{"markdown": "## Vision"}"###))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn generate_resolution_requires_thread() {
        let (status, _) = post_json(
            app(StubLlm::default()),
            "/generate-resolution",
            serde_json::json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn render_resolution_returns_sanitized_html() {
        let (status, body) = post_json(
            app(StubLlm::default()),
            "/render-resolution",
            serde_json::json!({"markdown": "## Vision\n\\*\\*Run\\*\\* <script>x()</script>"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let html = body["html"].as_str().unwrap();
        assert!(html.contains(r#"<h3 class="section-heading">Vision</h3>"#), "{html}");
        assert!(html.contains("<strong>Run</strong>"), "{html}");
        assert!(!html.contains("<script"), "{html}");

        let (status, body) = post_json(
            app(StubLlm::default()),
            "/render-resolution",
            serde_json::json!({"markdown": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No markdown text provided");
    }

    #[tokio::test]
    async fn health_reports_model() {
        let response = app(StubLlm::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["model"], "stub");
        assert_eq!(body["activeSessions"], 0);
    }
}
