//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! `EditorView` is the single display model handed to the view layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Difficulty, Example, Language, Problem, Submission};
use crate::store::EditorState;
use crate::verdict::ResultPanel;

/// Messages the view can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetState,
    SelectProblem {
        #[serde(rename = "problemId")]
        problem_id: i64,
    },
    SetLanguage {
        language: String,
    },
    EditCode {
        code: String,
    },
    Submit,
    Restore {
        #[serde(rename = "submissionId")]
        submission_id: i64,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    State { view: EditorView },
    Error { message: String },
}

/// Everything the view renders, derived from the store in one pass.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub problems: Vec<ProblemSummary>,
    pub problem: Option<ProblemOut>,
    pub languages: Vec<&'static str>,
    pub language: String,
    pub code: String,
    pub in_flight: bool,
    pub result: Option<ResultPanel>,
    pub history: Vec<HistoryEntry>,
    pub history_count: usize,
}

impl EditorView {
    pub fn from_state(s: &EditorState) -> Self {
        let history: Vec<HistoryEntry> = s.history().iter().map(HistoryEntry::from).collect();
        Self {
            problems: s.catalog().problems().iter().map(ProblemSummary::from).collect(),
            problem: s.selected().map(ProblemOut::from),
            languages: Language::ALL.iter().map(Language::as_str).collect(),
            language: s.language().to_string(),
            code: s.code().to_string(),
            in_flight: s.in_flight(),
            result: s.last_result().map(ResultPanel::from),
            history_count: history.len(),
            history,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProblemSummary {
    pub id: i64,
    pub title: String,
    pub difficulty: Difficulty,
}

impl From<&Problem> for ProblemSummary {
    fn from(p: &Problem) -> Self {
        Self { id: p.id, title: p.title.clone(), difficulty: p.difficulty }
    }
}

/// Description panel content for the selected problem.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemOut {
    pub id: i64,
    pub title: String,
    pub difficulty: Difficulty,
    pub function_name: String,
    pub description: String,
    pub constraints: Vec<String>,
    pub examples: Vec<ExampleOut>,
}

impl From<&Problem> for ProblemOut {
    fn from(p: &Problem) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            difficulty: p.difficulty,
            function_name: p.function_name.clone(),
            description: p.description.clone(),
            constraints: p.constraints.clone(),
            examples: p.examples.iter().map(ExampleOut::from).collect(),
        }
    }
}

/// An example rendered as the two lines shown under "Example N:".
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ExampleOut {
    pub input: String,
    pub output: String,
}

impl From<&Example> for ExampleOut {
    fn from(e: &Example) -> Self {
        let input = match &e.input {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| format!("{} = {}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let output = e.output().map(Value::to_string).unwrap_or_default();
        Self { input, output }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub status: String,
    pub accepted: bool,
}

impl From<&Submission> for HistoryEntry {
    fn from(s: &Submission) -> Self {
        Self { id: s.id, status: s.status.clone(), accepted: s.is_accepted() }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct SelectIn {
    #[serde(rename = "problemId")]
    pub problem_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LanguageIn {
    pub language: String,
}

#[derive(Deserialize)]
pub struct CodeIn {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct RestoreIn {
    #[serde(rename = "submissionId")]
    pub submission_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BoilerplateQuery {
    #[serde(rename = "problemId")]
    pub problem_id: i64,
    pub language: String,
}

#[derive(Serialize)]
pub struct BoilerplateOut {
    pub code: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
