//! Submission history for the selected problem.
//!
//! Held in the order the judge returned it and always replaced wholesale.

use crate::domain::Submission;

#[derive(Clone, Debug, Default)]
pub struct HistoryStore {
  submissions: Vec<Submission>,
}

impl HistoryStore {
  /// Forget everything; used when the selected problem changes.
  pub fn clear(&mut self) {
    self.submissions.clear();
  }

  /// Replace the held sequence. Never merges with what was there.
  pub fn load(&mut self, submissions: Vec<Submission>) -> &[Submission] {
    self.submissions = submissions;
    &self.submissions
  }

  pub fn submissions(&self) -> &[Submission] {
    &self.submissions
  }

  pub fn find(&self, submission_id: i64) -> Option<&Submission> {
    self.submissions.iter().find(|s| s.id == submission_id)
  }
}

/// Code to put back into the editor, byte for byte.
pub fn restore(submission: &Submission) -> String {
  submission.code.clone()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sub(id: i64, status: &str, code: &str) -> Submission {
    Submission { id, status: status.into(), code: code.into() }
  }

  #[test]
  fn load_replaces_instead_of_merging() {
    let mut h = HistoryStore::default();
    h.load(vec![sub(1, "Accepted", "a"), sub(2, "Error", "b")]);
    let now = h.load(vec![sub(9, "Accepted", "z")]);
    assert_eq!(now.len(), 1);
    assert!(h.find(1).is_none());
    assert!(h.find(9).is_some());
  }

  #[test]
  fn order_is_kept_as_received() {
    let mut h = HistoryStore::default();
    h.load(vec![sub(5, "Accepted", ""), sub(2, "Error", ""), sub(7, "Failed", "")]);
    let ids: Vec<i64> = h.submissions().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![5, 2, 7]);
  }

  #[test]
  fn clear_drops_entries() {
    let mut h = HistoryStore::default();
    h.load(vec![sub(1, "Accepted", "a")]);
    h.clear();
    assert!(h.submissions().is_empty());
  }

  #[test]
  fn restore_is_byte_exact() {
    let code = "def f(x):\r\n\treturn x  # ünïcode ✓\n\n";
    assert_eq!(restore(&sub(1, "Accepted", code)), code);
  }
}
