//! Starter source synthesis for a (problem, language) pair.
//!
//! Argument names come from the first example's input mapping; real types are not
//! derivable from the problem schema, so typed targets get `/*type*/` placeholders.

use serde_json::Value;

use crate::domain::{Language, Problem};

/// Name used when no argument list can be derived from the examples.
pub const FALLBACK_ARG: &str = "args";
/// Name used when the judge did not publish a function name.
pub const FALLBACK_FUNCTION: &str = "solution";
/// Marker standing in for a type the user must fill in.
pub const TYPE_PLACEHOLDER: &str = "/*type*/";

/// Deterministic starter code. Empty for a missing problem or an unrecognized language.
pub fn synthesize(problem: Option<&Problem>, language: &str) -> String {
  let Some(problem) = problem else { return String::new() };
  let Ok(language) = language.parse::<Language>() else { return String::new() };

  let name = if problem.function_name.trim().is_empty() {
    FALLBACK_FUNCTION
  } else {
    problem.function_name.trim()
  };
  let args = argument_names(problem);

  match language {
    Language::Python => python_stub(name, &args),
    Language::Cpp => cpp_stub(name, &args),
  }
}

/// Keys of `examples[0].input` in insertion order, or `["args"]`.
pub fn argument_names(problem: &Problem) -> Vec<String> {
  match problem.examples.first().and_then(|e| e.input.as_ref()) {
    Some(Value::Object(map)) => map.keys().cloned().collect(),
    _ => vec![FALLBACK_ARG.to_string()],
  }
}

fn python_stub(name: &str, args: &[String]) -> String {
  format!(
    "def {}({}):\n    # Write your solution here\n    pass\n",
    name,
    args.join(", ")
  )
}

fn cpp_stub(name: &str, args: &[String]) -> String {
  let params = args
    .iter()
    .map(|a| format!("{TYPE_PLACEHOLDER} {a}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "// Replace every {TYPE_PLACEHOLDER} placeholder with the real parameter and return types.\n\
     {TYPE_PLACEHOLDER} {name}({params}) {{\n    // Write your solution here\n}}\n"
  )
}
