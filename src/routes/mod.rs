//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - the view layer served from `static_dir` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>, static_dir: &str) -> Router {
    let static_service = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(format!("{}/index.html", static_dir.trim_end_matches('/'))));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/state", get(http::http_get_state))
        .route("/api/v1/problems", get(http::http_get_problems))
        .route("/api/v1/select", post(http::http_post_select))
        .route("/api/v1/language", post(http::http_post_language))
        .route("/api/v1/code", post(http::http_post_code))
        .route("/api/v1/submit", post(http::http_post_submit))
        .route("/api/v1/restore", post(http::http_post_restore))
        .route("/api/v1/boilerplate", get(http::http_get_boilerplate))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{Problem, Submission};
    use crate::judge::{Judge, JudgeError, SubmitRequest};
    use crate::logic::load_catalog;

    /// One problem, one past submission, and an accepted verdict for every run.
    pub(super) struct CannedJudge;

    #[async_trait]
    impl Judge for CannedJudge {
        async fn list_problems(&self) -> Result<Vec<Problem>, JudgeError> {
            Ok(serde_json::from_value(json!([
                {"id": 1, "title": "Two Sum", "difficulty": "Easy", "function_name": "two_sum",
                 "examples": [{"input": {"a": 1, "b": 2}, "output": 3}]}
            ]))
            .unwrap())
        }

        async fn list_submissions(&self, _problem_id: i64) -> Result<Vec<Submission>, JudgeError> {
            Ok(vec![Submission { id: 3, status: "Accepted".into(), code: "def two_sum(a, b): return a + b".into() }])
        }

        async fn submit(&self, _req: &SubmitRequest) -> Result<Value, JudgeError> {
            Ok(json!({"status": "Accepted", "passed": 14, "total": 14}))
        }
    }

    pub(super) async fn canned_state() -> AppState {
        let state = AppState::with_judge(Arc::new(CannedJudge), "python");
        load_catalog(&state).await;
        state
    }

    async fn app() -> Router {
        build_router(Arc::new(canned_state().await), "./static")
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn state_exposes_selected_problem_and_code() {
        let (status, body) = call(app().await, Request::get("/api/v1/state").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["problem"]["title"], "Two Sum");
        assert_eq!(body["problem"]["examples"][0]["input"], "a = 1, b = 2");
        assert!(body["code"].as_str().unwrap().starts_with("def two_sum(a, b):"));
        assert_eq!(body["historyCount"], 1);
    }

    #[tokio::test]
    async fn submit_returns_accepted_panel() {
        let (status, body) = call(app().await, Request::post("/api/v1/submit").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["status"], "Accepted");
        assert_eq!(body["result"]["summary"], "Passed 14/14 test cases.");
        assert_eq!(body["inFlight"], false);
    }

    #[tokio::test]
    async fn unknown_problem_is_not_found() {
        let (status, body) = call(app().await, post_json("/api/v1/select", json!({"problemId": 9}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown problem id 9");
    }

    #[tokio::test]
    async fn language_switch_and_restore() {
        let app = app().await;
        let (_, body) = call(app.clone(), post_json("/api/v1/language", json!({"language": "cpp"}))).await;
        assert!(body["code"].as_str().unwrap().contains("two_sum(/*type*/ a, /*type*/ b)"));

        let (status, body) = call(app, post_json("/api/v1/restore", json!({"submissionId": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "def two_sum(a, b): return a + b");
    }

    #[tokio::test]
    async fn boilerplate_preview() {
        let req = Request::get("/api/v1/boilerplate?problemId=1&language=python").body(Body::empty()).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["code"].as_str().unwrap().starts_with("def two_sum(a, b):"));
    }

    #[tokio::test]
    async fn submit_while_running_is_a_conflict() {
        let state = canned_state().await;
        state.editor.write().await.begin_submit();
        let app = build_router(Arc::new(state), "./static");
        let (status, body) = call(app, Request::post("/api/v1/submit").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "a submission is already running");
    }

    #[tokio::test]
    async fn unsupported_language_is_a_bad_request() {
        let app = app().await;
        let (status, body) = call(app.clone(), post_json("/api/v1/language", json!({"language": "cobol"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unsupported language: cobol");

        let (_, body) = call(app, Request::get("/api/v1/state").body(Body::empty()).unwrap()).await;
        assert_eq!(body["language"], "python");
    }
}
