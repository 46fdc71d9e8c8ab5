//! Judge verdicts: the tagged result of one submit call, and its display projection.
//!
//! The judge answers with a loosely shaped JSON object keyed on `status`. `interpret`
//! turns that into a `SubmissionResult` once; the view only ever sees a `ResultPanel`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::ACCEPTED;

pub const SYSTEM_ERROR: &str = "System Error";
/// Detail shown when the judge could not be reached at all.
pub const CONNECT_FAILURE_DETAILS: &str = "Could not connect to server.";
/// Label used when the judge response carries no usable `status`.
pub const UNKNOWN_STATUS: &str = "Unknown Status";

/// Outcome of a single submit. Immutable once built; the next submit replaces it.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionResult {
  /// Counts are passed through exactly as the judge sent them.
  Accepted { passed: Value, total: Value },
  Failed(Failure),
}

/// Any non-accepted verdict. Every detail the judge sent is kept; several may coexist.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Failure {
  pub status: String,
  /// Judge infrastructure crash.
  pub details: Option<String>,
  /// Language-level error raised by the user's code.
  pub error: Option<String>,
  pub wrong_answer: Option<WrongAnswer>,
  /// Raw runner output, present when the sandbox crashed.
  pub docker_logs: Option<String>,
  pub hint: Option<String>,
}

/// The first failing test case.
#[derive(Clone, Debug, PartialEq)]
pub struct WrongAnswer {
  pub test_case: Option<Value>,
  pub input: Option<Value>,
  pub expected: Value,
  pub got: Option<Value>,
}

/// Primary classification of a result, by display precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
  Accepted,
  SystemError,
  RuntimeError,
  WrongAnswer,
  /// A bare failure status such as "Time Limit Exceeded".
  Other,
}

impl SubmissionResult {
  /// Local result used when the submit call failed before any response existed.
  pub fn transport_failure() -> Self {
    SubmissionResult::Failed(Failure {
      status: SYSTEM_ERROR.into(),
      details: Some(CONNECT_FAILURE_DETAILS.into()),
      ..Failure::default()
    })
  }

  pub fn status(&self) -> &str {
    match self {
      SubmissionResult::Accepted { .. } => ACCEPTED,
      SubmissionResult::Failed(f) => &f.status,
    }
  }

  pub fn kind(&self) -> ResultKind {
    match self {
      SubmissionResult::Accepted { .. } => ResultKind::Accepted,
      SubmissionResult::Failed(f) if f.details.is_some() => ResultKind::SystemError,
      SubmissionResult::Failed(f) if f.error.is_some() => ResultKind::RuntimeError,
      SubmissionResult::Failed(f) if f.wrong_answer.is_some() => ResultKind::WrongAnswer,
      SubmissionResult::Failed(_) => ResultKind::Other,
    }
  }
}

/// Classify a raw judge response. Never fails: unexpected shapes become a failure panel.
pub fn interpret(raw: &Value) -> SubmissionResult {
  let empty = Map::new();
  let obj = raw.as_object().unwrap_or(&empty);

  let status = match obj.get("status") {
    Some(Value::String(s)) => s.clone(),
    _ => UNKNOWN_STATUS.to_string(),
  };

  if status == ACCEPTED {
    return SubmissionResult::Accepted {
      passed: obj.get("passed").cloned().unwrap_or(Value::Null),
      total: obj.get("total").cloned().unwrap_or(Value::Null),
    };
  }

  let wrong_answer = obj.get("expected").map(|expected| WrongAnswer {
    test_case: obj.get("test_case").cloned(),
    input: obj.get("input").cloned(),
    expected: expected.clone(),
    got: obj.get("got").cloned(),
  });

  SubmissionResult::Failed(Failure {
    status,
    details: text_field(obj, "details"),
    error: text_field(obj, "error"),
    wrong_answer,
    docker_logs: text_field(obj, "docker_logs"),
    hint: text_field(obj, "hint"),
  })
}

/// A text field that is present and non-blank; non-string values keep their JSON text.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
  match obj.get(key)? {
    Value::Null | Value::Bool(false) => None,
    Value::String(s) if s.is_empty() => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

/// Strings render bare, everything else as JSON.
fn plain(v: &Value) -> String {
  match v {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

// ---------------- display projection ----------------

/// What the console panel shows for one result. Absent fields are omitted.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultPanel {
  pub status: String,
  pub accepted: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub wrong_answer: Option<WrongAnswerPanel>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub docker_logs: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswerPanel {
  pub test_case: String,
  pub input: String,
  pub expected: String,
  pub got: String,
}

impl From<&SubmissionResult> for ResultPanel {
  fn from(r: &SubmissionResult) -> Self {
    match r {
      SubmissionResult::Accepted { passed, total } => ResultPanel {
        status: ACCEPTED.into(),
        accepted: true,
        summary: Some(format!("Passed {}/{} test cases.", plain(passed), plain(total))),
        details: None,
        error: None,
        wrong_answer: None,
        docker_logs: None,
        hint: None,
      },
      SubmissionResult::Failed(f) => ResultPanel {
        status: f.status.clone(),
        accepted: false,
        summary: None,
        details: f.details.clone(),
        error: f.error.clone(),
        wrong_answer: f.wrong_answer.as_ref().map(|w| WrongAnswerPanel {
          test_case: w.test_case.as_ref().map(plain).unwrap_or_default(),
          // A string input is already display text; anything else is shown as JSON.
          input: w.input.as_ref().map(plain).unwrap_or_default(),
          expected: w.expected.to_string(),
          got: w.got.as_ref().map(Value::to_string).unwrap_or_default(),
        }),
        docker_logs: f.docker_logs.clone(),
        hint: f.hint.clone(),
      },
    }
  }
}
