//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each function runs one store transition, performs the judge call the transition
//! asked for, and feeds the answer back into the store:
//!   - catalog load at startup (auto-selects the first problem)
//!   - problem selection (regenerates boilerplate, clears result, refetches history)
//!   - language change / edits / restore from history
//!   - submit, followed by a fire-and-forget history refresh

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::boilerplate::synthesize;
use crate::domain::Language;
use crate::judge::SubmitRequest;
use crate::state::AppState;
use crate::store::{HistoryFetch, SubmitTicket};

/// Requests the view layer should not have made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
  #[error("unknown problem id {0}")]
  UnknownProblem(i64),
  #[error("unknown submission id {0}")]
  UnknownSubmission(i64),
  #[error("no problem selected")]
  NoProblemSelected,
  #[error("a submission is already running")]
  SubmitInFlight,
  #[error("unsupported language: {0}")]
  UnsupportedLanguage(String),
}

/// Fetch the catalog once. A failure leaves the catalog empty. Returns the problem count.
#[instrument(level = "info", skip(state))]
pub async fn load_catalog(state: &AppState) -> usize {
  let problems = match state.judge.list_problems().await {
    Ok(p) => p,
    Err(e) => {
      error!(target: "judge", error = %e, "Problem catalog unavailable; starting empty.");
      return 0;
    }
  };
  let count = problems.len();
  let fetch = state.editor.write().await.apply_catalog(problems);
  info!(target: "leetclone_client", count, selected = ?fetch.map(|f| f.problem_id), "Catalog loaded");
  if let Some(fetch) = fetch {
    refresh_history(state, fetch).await;
  }
  count
}

/// Fetch history for `fetch.problem_id` and install it if the selection has not moved on.
#[instrument(level = "debug", skip(state), fields(problem_id = fetch.problem_id, generation = fetch.generation))]
pub async fn refresh_history(state: &AppState, fetch: HistoryFetch) -> bool {
  match state.judge.list_submissions(fetch.problem_id).await {
    Ok(subs) => {
      let count = subs.len();
      let applied = state.editor.write().await.apply_history(fetch, subs);
      if applied {
        debug!(target: "leetclone_client", problem_id = fetch.problem_id, count, "History replaced");
      } else {
        debug!(target: "leetclone_client", problem_id = fetch.problem_id, "Stale history response dropped");
      }
      applied
    }
    Err(e) => {
      warn!(target: "judge", problem_id = fetch.problem_id, error = %e, "History fetch failed; keeping current list.");
      false
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn select_problem(state: &AppState, problem_id: i64) -> Result<(), EditorError> {
  let fetch = state
    .editor
    .write()
    .await
    .select_problem(problem_id)
    .ok_or(EditorError::UnknownProblem(problem_id))?;
  refresh_history(state, fetch).await;
  Ok(())
}

/// Only languages the judge can run are accepted; anything else leaves the editor as is.
#[instrument(level = "info", skip(state))]
pub async fn set_language(state: &AppState, language: &str) -> Result<(), EditorError> {
  let language: Language = language
    .parse()
    .map_err(|_| EditorError::UnsupportedLanguage(language.to_string()))?;
  state.editor.write().await.set_language(language.as_str());
  Ok(())
}

#[instrument(level = "debug", skip(state, code), fields(code_len = code.len()))]
pub async fn edit_code(state: &AppState, code: String) {
  state.editor.write().await.edit(code);
}

#[instrument(level = "info", skip(state))]
pub async fn restore(state: &AppState, submission_id: i64) -> Result<(), EditorError> {
  state
    .editor
    .write()
    .await
    .restore(submission_id)
    .map(|_| ())
    .ok_or(EditorError::UnknownSubmission(submission_id))
}

/// Starter code for any catalog problem, without touching the editor buffer.
pub async fn boilerplate_for(state: &AppState, problem_id: i64, language: &str) -> Result<String, EditorError> {
  let editor = state.editor.read().await;
  let problem = editor.catalog().get(problem_id).ok_or(EditorError::UnknownProblem(problem_id))?;
  Ok(synthesize(Some(problem), language))
}

/// Run one submit to completion.
///
/// The in-flight check here is the Run-control guard; the store itself never rejects.
/// The judge round trip runs on its own task, so a caller that goes away (a dropped
/// HTTP request) cannot leave `in_flight` set. The returned handle is the background
/// history refresh, if one was started; callers normally drop it.
#[instrument(level = "info", skip(state))]
pub async fn submit(state: &AppState) -> Result<Option<JoinHandle<bool>>, EditorError> {
  let ticket = {
    let mut editor = state.editor.write().await;
    if editor.in_flight() {
      return Err(EditorError::SubmitInFlight);
    }
    if editor.language().parse::<Language>().is_err() {
      return Err(EditorError::UnsupportedLanguage(editor.language().to_string()));
    }
    editor.begin_submit().ok_or(EditorError::NoProblemSelected)?
  };

  let task = tokio::spawn(run_submit(state.clone(), ticket.clone()).in_current_span());
  match task.await {
    Ok(refresh) => Ok(refresh),
    Err(e) => {
      error!(target: "leetclone_client", problem_id = ticket.problem_id, error = %e, "Submit task died");
      state.editor.write().await.finish_submit(&ticket, None);
      Ok(None)
    }
  }
}

async fn run_submit(state: AppState, ticket: SubmitTicket) -> Option<JoinHandle<bool>> {
  let req = SubmitRequest {
    problem_id: ticket.problem_id,
    language: ticket.language.clone(),
    code: ticket.code.clone(),
  };
  let response = match state.judge.submit(&req).await {
    Ok(raw) => Some(raw),
    Err(e) => {
      warn!(target: "judge", problem_id = ticket.problem_id, error = %e, "Submit failed before a verdict existed");
      None
    }
  };

  let refetch = {
    let mut editor = state.editor.write().await;
    let refetch = editor.finish_submit(&ticket, response.as_ref());
    if !editor.is_current(ticket.generation) {
      debug!(
        target: "leetclone_client",
        problem_id = ticket.problem_id,
        issued = ticket.generation,
        current = editor.generation(),
        "Verdict for a deselected problem dropped"
      );
    } else if let Some(r) = editor.last_result() {
      info!(target: "leetclone_client", problem_id = ticket.problem_id, status = %r.status(), kind = ?r.kind(), "Submit finished");
    }
    refetch
  };

  refetch.map(|fetch| tokio::spawn(async move { refresh_history(&state, fetch).await }))
}
