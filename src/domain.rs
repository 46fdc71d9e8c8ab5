//! Domain models shared by the editor core: problems, examples, past submissions, languages.
//!
//! Problem payloads come from the judge collaborator and are only loosely structured,
//! so most fields tolerate absence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Difficulty label as published by the judge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "Value")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  /// Anything the judge sends that we do not know about.
  #[default]
  Unknown,
}

impl From<Value> for Difficulty {
  fn from(v: Value) -> Self {
    match v.as_str() {
      Some("Easy") => Difficulty::Easy,
      Some("Medium") => Difficulty::Medium,
      Some("Hard") => Difficulty::Hard,
      _ => Difficulty::Unknown,
    }
  }
}

/// One worked example attached to a problem.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Example {
  /// Either a mapping argument-name -> value, or a bare value (array, scalar).
  #[serde(default)] pub input: Option<Value>,
  #[serde(default)] pub output: Option<Value>,
  /// Legacy key used by older seed data.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub expected_output: Option<Value>,
}

impl Example {
  /// `output` wins over the legacy `expected_output`.
  pub fn output(&self) -> Option<&Value> {
    self.output.as_ref().or(self.expected_output.as_ref())
  }
}

/// A coding exercise as listed by `GET /problems`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Problem {
  pub id: i64,
  #[serde(default)] pub title: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub difficulty: Difficulty,
  #[serde(default)] pub function_name: String,
  #[serde(default)] pub description: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub constraints: Vec<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub examples: Vec<Example>,
}

/// One historical attempt, as listed by `GET /problems/{id}/submissions`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Submission {
  pub id: i64,
  #[serde(default)] pub status: String,
  #[serde(default, alias = "user_code")]
  pub code: String,
}

impl Submission {
  pub fn is_accepted(&self) -> bool {
    self.status == ACCEPTED
  }
}

/// Status label the judge uses for a fully passing run.
pub const ACCEPTED: &str = "Accepted";

/// Target languages the editor can synthesize starter code for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
  Python,
  Cpp,
}

impl Language {
  pub const ALL: &'static [Language] = &[Language::Python, Language::Cpp];

  /// Wire name sent in `POST /submit`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Language::Python => "python",
      Language::Cpp => "cpp",
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Language {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "python" => Ok(Language::Python),
      "cpp" => Ok(Language::Cpp),
      other => Err(format!("unsupported language: {other}")),
    }
  }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
  D: serde::Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
