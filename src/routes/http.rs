//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Every mutating endpoint answers with the fresh `EditorView`.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::{IntoResponse, Response}};
use tracing::{info, instrument};

use crate::logic::{self, EditorError};
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for EditorError {
  fn into_response(self) -> Response {
    let status = match self {
      EditorError::UnknownProblem(_) | EditorError::UnknownSubmission(_) => StatusCode::NOT_FOUND,
      EditorError::NoProblemSelected | EditorError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
      EditorError::SubmitInFlight => StatusCode::CONFLICT,
    };
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_state(State(state): State<Arc<AppState>>) -> Json<EditorView> {
  Json(state.view().await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_problems(State(state): State<Arc<AppState>>) -> Json<Vec<ProblemSummary>> {
  Json(state.view().await.problems)
}

#[instrument(level = "info", skip(state), fields(problem_id = body.problem_id))]
pub async fn http_post_select(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SelectIn>,
) -> Result<Json<EditorView>, EditorError> {
  logic::select_problem(&state, body.problem_id).await?;
  info!(target: "leetclone_client", problem_id = body.problem_id, "HTTP problem selected");
  Ok(Json(state.view().await))
}

#[instrument(level = "info", skip(state), fields(language = %body.language))]
pub async fn http_post_language(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LanguageIn>,
) -> Result<Json<EditorView>, EditorError> {
  logic::set_language(&state, &body.language).await?;
  Ok(Json(state.view().await))
}

#[instrument(level = "debug", skip(state, body), fields(code_len = body.code.len()))]
pub async fn http_post_code(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CodeIn>,
) -> Json<EditorView> {
  logic::edit_code(&state, body.code).await;
  Json(state.view().await)
}

/// Waits for the verdict; the history refresh it triggers continues in the background.
#[instrument(level = "info", skip(state))]
pub async fn http_post_submit(State(state): State<Arc<AppState>>) -> Result<Json<EditorView>, EditorError> {
  logic::submit(&state).await?;
  Ok(Json(state.view().await))
}

#[instrument(level = "info", skip(state), fields(submission_id = body.submission_id))]
pub async fn http_post_restore(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RestoreIn>,
) -> Result<Json<EditorView>, EditorError> {
  logic::restore(&state, body.submission_id).await?;
  Ok(Json(state.view().await))
}

#[instrument(level = "info", skip(state), fields(problem_id = q.problem_id, language = %q.language))]
pub async fn http_get_boilerplate(
  State(state): State<Arc<AppState>>,
  Query(q): Query<BoilerplateQuery>,
) -> Result<Json<BoilerplateOut>, EditorError> {
  let code = logic::boilerplate_for(&state, q.problem_id, &q.language).await?;
  Ok(Json(BoilerplateOut { code }))
}
