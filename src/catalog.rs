//! Problem catalog: the list fetched once at startup plus the current selection.

use crate::domain::Problem;

#[derive(Clone, Debug, Default)]
pub struct ProblemCatalog {
  problems: Vec<Problem>,
  selected: Option<usize>,
}

impl ProblemCatalog {
  /// Replace the (empty) catalog with the loaded list; the first entry becomes selected.
  pub fn load(&mut self, problems: Vec<Problem>) -> Option<&Problem> {
    self.selected = if problems.is_empty() { None } else { Some(0) };
    self.problems = problems;
    self.selected()
  }

  /// Move the selection to `id`. Unknown ids leave the selection untouched and return `None`.
  pub fn select(&mut self, id: i64) -> Option<&Problem> {
    let idx = self.problems.iter().position(|p| p.id == id)?;
    self.selected = Some(idx);
    self.problems.get(idx)
  }

  pub fn selected(&self) -> Option<&Problem> {
    self.selected.and_then(|i| self.problems.get(i))
  }

  pub fn get(&self, id: i64) -> Option<&Problem> {
    self.problems.iter().find(|p| p.id == id)
  }

  pub fn problems(&self) -> &[Problem] {
    &self.problems
  }
}
