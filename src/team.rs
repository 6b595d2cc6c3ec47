//! Team assignments loaded from the optional team file
//!
//! The team file maps writing agent numbers to team labels. It is loaded
//! independently of the submissions export and replaces any previous mapping
//! wholesale. Agents that cannot be resolved fall back to [`NO_TEAM`].

use crate::error::Result;
use crate::submission::loader::ensure_csv_extension;
use crate::submission::AGENT_NUMBER;
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Team label for agents without an assignment
pub const NO_TEAM: &str = "NO TEAM";

/// Accepted headers for the team column
pub const TEAM_ID_COLUMNS: [&str; 2] = ["Team ID", "ID de Equipo"];

/// Agent number -> team label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    teams: HashMap<String, String>,
}

impl TeamAssignment {
    /// An empty mapping; every agent resolves to [`NO_TEAM`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Team for an agent number, [`NO_TEAM`] when absent
    pub fn team_for(&self, agent_number: Option<&str>) -> &str {
        agent_number
            .and_then(|n| self.teams.get(n.trim()))
            .map(String::as_str)
            .unwrap_or(NO_TEAM)
    }

    /// Distinct team labels, sorted
    pub fn teams(&self) -> Vec<String> {
        self.teams
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Later pairs overwrite earlier ones; pairs with a blank side are dropped
impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for TeamAssignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut teams = HashMap::new();
        for (number, team) in iter {
            let (number, team) = (number.as_ref().trim(), team.as_ref().trim());
            if !number.is_empty() && !team.is_empty() {
                teams.insert(number.to_string(), team.to_string());
            }
        }
        Self { teams }
    }
}

/// Load team assignments from any reader
///
/// Rows that are ragged, unreadable or missing either value are skipped.
pub fn load_team_assignments_from_reader<R: Read>(reader: R) -> Result<TeamAssignment> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let number_col = headers.iter().position(|h| h.trim() == AGENT_NUMBER);
    let team_col = headers
        .iter()
        .position(|h| TEAM_ID_COLUMNS.contains(&h.trim()));

    let (Some(number_col), Some(team_col)) = (number_col, team_col) else {
        warn!(
            "Team file lacks '{}' or '{}' column; no teams loaded",
            AGENT_NUMBER, TEAM_ID_COLUMNS[0]
        );
        return Ok(TeamAssignment::new());
    };

    let mut pairs = Vec::new();
    for result in csv_reader.records() {
        match result {
            Ok(record) => {
                if let (Some(number), Some(team)) = (record.get(number_col), record.get(team_col)) {
                    pairs.push((number.to_string(), team.to_string()));
                }
            }
            Err(err) => debug!("Skipping unreadable team row: {}", err),
        }
    }

    let assignment: TeamAssignment = pairs.into_iter().collect();
    info!("Loaded {} team assignments", assignment.len());
    Ok(assignment)
}

/// Parse team assignments from CSV text already in memory
pub fn parse_team_assignments(text: &str) -> Result<TeamAssignment> {
    load_team_assignments_from_reader(text.as_bytes())
}

/// Load team assignments from a `.csv` file on disk
pub fn load_team_assignments<P: AsRef<Path>>(path: P) -> Result<TeamAssignment> {
    let path = path.as_ref();
    ensure_csv_extension(path)?;
    load_team_assignments_from_reader(File::open(path)?)
}
