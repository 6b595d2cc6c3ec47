//! An immutable set of submissions with its agent-number index

use super::SubmissionRow;
use std::collections::HashMap;

/// The rows of one uploaded export
///
/// Built once per file and never mutated; the agent-number index is computed up
/// front so team resolution is a map lookup per agent.
#[derive(Debug, Clone, Default)]
pub struct SubmissionSet {
    rows: Vec<SubmissionRow>,
    agent_numbers: HashMap<String, String>,
}

impl SubmissionSet {
    pub fn new(rows: Vec<SubmissionRow>) -> Self {
        let mut agent_numbers = HashMap::new();
        for row in &rows {
            let key = row.agent_key();
            if key.is_empty() || agent_numbers.contains_key(&key) {
                continue;
            }
            // The first row for an agent decides the number, even when blank
            agent_numbers.insert(key, row.agent_number().unwrap_or_default().to_string());
        }

        Self { rows, agent_numbers }
    }

    pub fn rows(&self) -> &[SubmissionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Agent number from the first row whose name matches (case-insensitive)
    pub fn agent_number(&self, agent_name: &str) -> Option<&str> {
        self.agent_numbers
            .get(&agent_name.to_lowercase())
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }
}

impl From<Vec<SubmissionRow>> for SubmissionSet {
    fn from(rows: Vec<SubmissionRow>) -> Self {
        Self::new(rows)
    }
}
