//! Editor state store.
//!
//! All mutation goes through the transitions below. A transition never performs I/O;
//! when it needs the judge it returns a ticket (`HistoryFetch`, `SubmitTicket`) that the
//! caller executes and later feeds back in.
//!
//! Every problem selection bumps `generation`. Async answers carry the generation they
//! were issued under and are dropped if the user has moved on since.

use serde_json::Value;

use crate::boilerplate::synthesize;
use crate::catalog::ProblemCatalog;
use crate::domain::{Problem, Submission};
use crate::history::{self, HistoryStore};
use crate::verdict::{interpret, SubmissionResult};

/// A history fetch the caller must perform for `problem_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryFetch {
  pub problem_id: i64,
  pub generation: u64,
}

/// Everything needed to issue one `POST /submit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitTicket {
  pub problem_id: i64,
  pub language: String,
  pub code: String,
  pub generation: u64,
}

#[derive(Clone, Debug)]
pub struct EditorState {
  catalog: ProblemCatalog,
  history: HistoryStore,
  language: String,
  code: String,
  in_flight: bool,
  last_result: Option<SubmissionResult>,
  generation: u64,
}

impl EditorState {
  pub fn new(language: impl Into<String>) -> Self {
    Self {
      catalog: ProblemCatalog::default(),
      history: HistoryStore::default(),
      language: language.into(),
      code: String::new(),
      in_flight: false,
      last_result: None,
      generation: 0,
    }
  }

  // ---- selection ----

  /// Install the catalog fetched at startup. Selects the first problem if any.
  pub fn apply_catalog(&mut self, problems: Vec<Problem>) -> Option<HistoryFetch> {
    self.catalog.load(problems)?;
    self.on_selection_changed()
  }

  /// Select `id`. Unknown ids change nothing and return `None`.
  pub fn select_problem(&mut self, id: i64) -> Option<HistoryFetch> {
    self.catalog.select(id)?;
    self.on_selection_changed()
  }

  fn on_selection_changed(&mut self) -> Option<HistoryFetch> {
    let problem_id = self.catalog.selected()?.id;
    self.generation += 1;
    self.regenerate_code();
    self.last_result = None;
    self.history.clear();
    Some(HistoryFetch { problem_id, generation: self.generation })
  }

  // ---- editor buffer ----

  /// Switch target language; the buffer is regenerated and unsaved edits are dropped.
  pub fn set_language(&mut self, language: &str) {
    self.language = language.to_string();
    self.regenerate_code();
  }

  pub fn edit(&mut self, code: String) {
    self.code = code;
  }

  fn regenerate_code(&mut self) {
    self.code = synthesize(self.catalog.selected(), &self.language);
  }

  // ---- submit lifecycle ----

  /// Start a submit for the selected problem. Does not check `in_flight`; the view
  /// layer is expected to hold the Run control while a submit is pending.
  pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
    let problem_id = self.catalog.selected()?.id;
    self.in_flight = true;
    self.last_result = None;
    Some(SubmitTicket {
      problem_id,
      language: self.language.clone(),
      code: self.code.clone(),
      generation: self.generation,
    })
  }

  /// Apply the judge's answer (`None` when the call failed before any response existed).
  ///
  /// Returns the history refetch to fire, which only happens after a real response.
  pub fn finish_submit(&mut self, ticket: &SubmitTicket, response: Option<&Value>) -> Option<HistoryFetch> {
    self.in_flight = false;
    if !self.is_current(ticket.generation) {
      return None;
    }
    match response {
      Some(raw) => {
        self.last_result = Some(interpret(raw));
        Some(HistoryFetch { problem_id: ticket.problem_id, generation: ticket.generation })
      }
      None => {
        self.last_result = Some(SubmissionResult::transport_failure());
        None
      }
    }
  }

  // ---- history ----

  /// Install a fetched history. Returns `false` if the fetch went stale and was dropped.
  pub fn apply_history(&mut self, fetch: HistoryFetch, submissions: Vec<Submission>) -> bool {
    if !self.is_current(fetch.generation) {
      return false;
    }
    self.history.load(submissions);
    true
  }

  /// Overwrite the buffer with a past submission's code.
  pub fn restore(&mut self, submission_id: i64) -> Option<&str> {
    let code = history::restore(self.history.find(submission_id)?);
    self.code = code;
    Some(&self.code)
  }

  // ---- reads ----

  pub fn is_current(&self, generation: u64) -> bool {
    self.generation == generation
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn catalog(&self) -> &ProblemCatalog {
    &self.catalog
  }

  pub fn selected(&self) -> Option<&Problem> {
    self.catalog.selected()
  }

  pub fn history(&self) -> &[Submission] {
    self.history.submissions()
  }

  pub fn language(&self) -> &str {
    &self.language
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn in_flight(&self) -> bool {
    self.in_flight
  }

  pub fn last_result(&self) -> Option<&SubmissionResult> {
    self.last_result.as_ref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::verdict::ResultKind;
  use serde_json::json;

  fn catalog() -> Vec<Problem> {
    serde_json::from_value(json!([
      {"id": 1, "title": "Two Sum", "difficulty": "Easy", "function_name": "two_sum",
       "examples": [{"input": {"a": 1, "b": 2}, "output": 3}]},
      {"id": 2, "title": "Reverse", "difficulty": "Medium", "function_name": "reverse",
       "examples": [{"input": [1, 2, 3], "expected_output": [3, 2, 1]}]}
    ]))
    .unwrap()
  }

  fn sub(id: i64, code: &str) -> Submission {
    Submission { id, status: "Accepted".into(), code: code.into() }
  }

  fn loaded() -> (EditorState, HistoryFetch) {
    let mut s = EditorState::new("python");
    let fetch = s.apply_catalog(catalog()).unwrap();
    (s, fetch)
  }

  #[test]
  fn catalog_load_selects_first_and_generates_code() {
    let (s, fetch) = loaded();
    assert_eq!(fetch, HistoryFetch { problem_id: 1, generation: 1 });
    assert_eq!(s.selected().map(|p| p.id), Some(1));
    assert!(s.code().starts_with("def two_sum(a, b):"));
  }

  #[test]
  fn empty_catalog_leaves_nothing_selected() {
    let mut s = EditorState::new("python");
    assert!(s.apply_catalog(vec![]).is_none());
    assert!(s.selected().is_none());
    assert_eq!(s.code(), "");
    assert!(s.begin_submit().is_none());
  }

  #[test]
  fn language_switch_regenerates_and_drops_edits() {
    let (mut s, _) = loaded();
    s.edit("my work".into());
    s.set_language("cpp");
    assert!(s.code().contains("two_sum(/*type*/ a, /*type*/ b)"));
    s.set_language("cobol");
    assert_eq!(s.code(), "");
    assert_eq!(s.language(), "cobol");
  }

  #[test]
  fn selection_clears_result_and_replaces_history() {
    let (mut s, fetch) = loaded();
    assert!(s.apply_history(fetch, vec![sub(10, "old"), sub(11, "older")]));
    let t = s.begin_submit().unwrap();
    s.finish_submit(&t, Some(&json!({"status": "Accepted", "passed": 1, "total": 1})));
    assert!(s.last_result().is_some());

    let next = s.select_problem(2).unwrap();
    assert!(s.last_result().is_none());
    assert!(s.history().is_empty());
    assert!(s.code().starts_with("def reverse(args):"));

    assert!(s.apply_history(next, vec![sub(20, "new")]));
    let ids: Vec<i64> = s.history().iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![20]);
  }

  #[test]
  fn unknown_selection_is_a_no_op() {
    let (mut s, _) = loaded();
    let t = s.begin_submit().unwrap();
    s.finish_submit(&t, Some(&json!({"status": "Wrong Answer"})));
    s.edit("keep me".into());
    let generation = s.generation();

    assert!(s.select_problem(404).is_none());
    assert_eq!(s.generation(), generation);
    assert_eq!(s.code(), "keep me");
    assert!(s.last_result().is_some());
  }

  #[test]
  fn submit_captures_buffer_and_toggles_in_flight() {
    let (mut s, _) = loaded();
    s.edit("def two_sum(a, b):\n    return a + b\n".into());
    let t = s.begin_submit().unwrap();
    assert!(s.in_flight());
    assert_eq!(t.problem_id, 1);
    assert_eq!(t.language, "python");
    assert_eq!(t.code, "def two_sum(a, b):\n    return a + b\n");

    let refetch = s.finish_submit(&t, Some(&json!({"status": "Accepted", "passed": 14, "total": 14})));
    assert!(!s.in_flight());
    assert_eq!(refetch, Some(HistoryFetch { problem_id: 1, generation: 1 }));
    assert_eq!(s.last_result().map(|r| r.kind()), Some(ResultKind::Accepted));
  }

  #[test]
  fn begin_submit_clears_previous_result() {
    let (mut s, _) = loaded();
    let t = s.begin_submit().unwrap();
    s.finish_submit(&t, Some(&json!({"status": "Error", "error": "x"})));
    s.begin_submit().unwrap();
    assert!(s.last_result().is_none());
  }

  #[test]
  fn transport_failure_sets_system_error_without_refetch() {
    let (mut s, _) = loaded();
    let t = s.begin_submit().unwrap();
    assert!(s.finish_submit(&t, None).is_none());
    assert!(!s.in_flight());
    assert_eq!(s.last_result(), Some(&SubmissionResult::transport_failure()));
  }

  #[test]
  fn stale_history_is_discarded_after_switching() {
    let (mut s, _) = loaded();
    let t = s.begin_submit().unwrap();
    let refetch = s.finish_submit(&t, Some(&json!({"status": "Accepted"}))).unwrap();

    let current = s.select_problem(2).unwrap();
    assert!(s.apply_history(current, vec![sub(20, "p2")]));
    assert!(!s.apply_history(refetch, vec![sub(10, "p1")]));
    assert_eq!(s.history(), &[sub(20, "p2")]);
  }

  #[test]
  fn stale_submit_result_is_discarded_but_releases_in_flight() {
    let (mut s, _) = loaded();
    let t = s.begin_submit().unwrap();
    s.select_problem(2);
    assert!(s.finish_submit(&t, Some(&json!({"status": "Accepted"}))).is_none());
    assert!(s.last_result().is_none());
    assert!(!s.in_flight());
  }

  #[test]
  fn restore_overwrites_unsaved_edits() {
    let (mut s, fetch) = loaded();
    s.apply_history(fetch, vec![sub(10, "def two_sum(a, b):\n    return a+b\n")]);
    s.edit("half-typed".into());
    assert_eq!(s.restore(10), Some("def two_sum(a, b):\n    return a+b\n"));
    assert_eq!(s.code(), "def two_sum(a, b):\n    return a+b\n");
    assert!(s.restore(99).is_none());
  }
}
