//! HTTP client for the judge collaborator.
//!
//! Only three calls are used: list problems, list submissions of a problem, submit code.
//! Calls are instrumented and log ids, sizes and latencies, never the submitted source.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::JudgeSettings;
use crate::domain::{Problem, Submission};

#[derive(Debug, Error)]
pub enum JudgeError {
  /// The request failed before any response existed (unreachable, timeout, reset).
  #[error("judge unreachable: {0}")]
  Transport(String),
  #[error("judge HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("judge response could not be decoded: {0}")]
  Decode(String),
}

/// Body of `POST /submit`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitRequest {
  pub problem_id: i64,
  pub language: String,
  pub code: String,
}

/// The collaborator operations the editor core depends on.
#[async_trait]
pub trait Judge: Send + Sync {
  async fn list_problems(&self) -> Result<Vec<Problem>, JudgeError>;
  async fn list_submissions(&self, problem_id: i64) -> Result<Vec<Submission>, JudgeError>;
  /// Raw verdict JSON; interpretation happens in `verdict::interpret`.
  async fn submit(&self, req: &SubmitRequest) -> Result<Value, JudgeError>;
}

#[derive(Clone)]
pub struct JudgeClient {
  pub client: reqwest::Client,
  pub base_url: String,
  pub user_agent: String,
}

impl JudgeClient {
  pub fn new(settings: &JudgeSettings) -> Result<Self, JudgeError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(settings.timeout_secs))
      .build()
      .map_err(|e| JudgeError::Transport(e.to_string()))?;
    Ok(Self {
      client,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      user_agent: settings.user_agent.clone(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// Turn a sent request into JSON, mapping each failure stage to its error kind.
  async fn read_json<T: for<'a> Deserialize<'a>>(
    &self,
    sent: Result<reqwest::Response, reqwest::Error>,
  ) -> Result<T, JudgeError> {
    let res = sent.map_err(|e| JudgeError::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_judge_error(&body).unwrap_or(body);
      return Err(JudgeError::Status { status, message });
    }

    let bytes = res.bytes().await.map_err(|e| JudgeError::Transport(e.to_string()))?;
    serde_json::from_slice::<T>(&bytes).map_err(|e| JudgeError::Decode(e.to_string()))
  }
}

#[async_trait]
impl Judge for JudgeClient {
  #[instrument(level = "info", skip(self), fields(base_url = %self.base_url))]
  async fn list_problems(&self) -> Result<Vec<Problem>, JudgeError> {
    let start = Instant::now();
    let sent = self.client.get(self.url("/problems"))
      .header(USER_AGENT, &self.user_agent)
      .send().await;
    let problems: Vec<Problem> = self.read_json(sent).await?;
    info!(target: "judge", count = problems.len(), elapsed = ?start.elapsed(), "Problem catalog fetched");
    Ok(problems)
  }

  #[instrument(level = "info", skip(self))]
  async fn list_submissions(&self, problem_id: i64) -> Result<Vec<Submission>, JudgeError> {
    let start = Instant::now();
    let sent = self.client.get(self.url(&format!("/problems/{}/submissions", problem_id)))
      .header(USER_AGENT, &self.user_agent)
      .send().await;
    let subs: Vec<Submission> = self.read_json(sent).await?;
    debug!(target: "judge", %problem_id, count = subs.len(), elapsed = ?start.elapsed(), "Submission history fetched");
    Ok(subs)
  }

  #[instrument(level = "info", skip(self, req), fields(problem_id = req.problem_id, language = %req.language, code_len = req.code.len()))]
  async fn submit(&self, req: &SubmitRequest) -> Result<Value, JudgeError> {
    let start = Instant::now();
    let sent = self.client.post(self.url("/submit"))
      .header(USER_AGENT, &self.user_agent)
      .header(CONTENT_TYPE, "application/json")
      .json(req)
      .send().await;
    let verdict: Value = self.read_json(sent).await?;
    let status = verdict.get("status").and_then(Value::as_str).unwrap_or("?");
    info!(
      target: "judge",
      problem_id = req.problem_id,
      status = %status,
      elapsed = ?start.elapsed(),
      "Judge verdict received"
    );
    Ok(verdict)
  }
}

/// FastAPI-style error bodies carry `{"detail": "..."}`.
fn extract_judge_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { detail: Value }
  match serde_json::from_str::<EWrap>(body) {
    Ok(EWrap { detail: Value::String(s) }) => Some(s),
    Ok(EWrap { detail }) => Some(detail.to_string()),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{Arc, Mutex};

  use axum::{extract::{Path, State}, routing::{get, post}, Json, Router};
  use serde_json::json;
  use tokio::net::TcpListener;

  type Seen = Arc<Mutex<Vec<SubmitRequest>>>;

  async fn spawn_judge(seen: Seen) -> String {
    let app = Router::new()
      .route("/problems", get(|| async {
        Json(json!([{"id": 1, "title": "Two Sum", "difficulty": "Easy", "function_name": "two_sum",
                     "examples": [{"input": {"a": 1, "b": 2}, "output": 3}]}]))
      }))
      .route("/problems/:id/submissions", get(|Path(id): Path<i64>| async move {
        if id == 1 {
          Ok(Json(json!([{"id": 8, "status": "Accepted", "code": "x"}])))
        } else {
          Err((axum::http::StatusCode::NOT_FOUND, Json(json!({"detail": "Problem not found"}))))
        }
      }))
      .route("/submit", post(|State(seen): State<Seen>, Json(body): Json<SubmitRequest>| async move {
        seen.lock().unwrap().push(body);
        Json(json!({"status": "Accepted", "passed": 14, "total": 14}))
      }))
      .route("/garbage", get(|| async { "not json" }))
      .with_state(seen);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{}", addr)
  }

  fn client(base_url: String) -> JudgeClient {
    JudgeClient::new(&JudgeSettings { base_url, timeout_secs: 5, ..JudgeSettings::default() }).unwrap()
  }

  #[tokio::test]
  async fn lists_problems_and_submissions() {
    let judge = client(spawn_judge(Seen::default()).await);
    let problems = judge.list_problems().await.unwrap();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].function_name, "two_sum");

    let subs = judge.list_submissions(1).await.unwrap();
    assert_eq!(subs[0].id, 8);
  }

  #[tokio::test]
  async fn submit_posts_expected_body() {
    let seen = Seen::default();
    let judge = client(spawn_judge(seen.clone()).await);
    let req = SubmitRequest { problem_id: 1, language: "cpp".into(), code: "int main(){}".into() };
    let verdict = judge.submit(&req).await.unwrap();
    assert_eq!(verdict["passed"], 14);
    assert_eq!(seen.lock().unwrap().as_slice(), &[req]);
  }

  #[tokio::test]
  async fn non_success_status_carries_detail() {
    let judge = client(spawn_judge(Seen::default()).await);
    match judge.list_submissions(42).await {
      Err(JudgeError::Status { status, message }) => {
        assert_eq!(status, 404);
        assert_eq!(message, "Problem not found");
      }
      other => panic!("unexpected: {:?}", other),
    }
  }

  #[tokio::test]
  async fn undecodable_body_is_a_decode_error() {
    let base = spawn_judge(Seen::default()).await;
    let judge = client(base);
    let sent = judge.client.get(judge.url("/garbage")).send().await;
    let res: Result<Value, _> = judge.read_json(sent).await;
    assert!(matches!(res, Err(JudgeError::Decode(_))));
  }

  #[tokio::test]
  async fn unreachable_judge_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let judge = client(format!("http://{}", addr));
    let req = SubmitRequest { problem_id: 1, language: "python".into(), code: String::new() };
    assert!(matches!(judge.submit(&req).await, Err(JudgeError::Transport(_))));
  }
}
