//! Report presentation options: ordering, record cap and language

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering applied to the display rows before truncation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Annualized premium, highest first
    #[default]
    Annualized,
    /// Monthly premium, highest first
    Monthly,
    /// Agent name, A to Z
    Alphabetical,
    /// Keep the order produced by aggregation
    Aggregated,
}

impl FromStr for SortBy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annualized" => Ok(SortBy::Annualized),
            "monthly" => Ok(SortBy::Monthly),
            "alphabetical" | "name" => Ok(SortBy::Alphabetical),
            "aggregated" | "original" => Ok(SortBy::Aggregated),
            _ => Err(ReportError::InvalidValue { field: "sort", value: s.to_string() }),
        }
    }
}

/// Language for report labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl FromStr for Language {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "es" | "spanish" | "español" => Ok(Language::Es),
            _ => Err(ReportError::InvalidValue { field: "language", value: s.to_string() }),
        }
    }
}

/// Options controlling how the aggregated rows are presented
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Maximum number of agents to keep (0 = all)
    #[serde(default)]
    pub max_records: usize,

    /// Row ordering
    #[serde(default)]
    pub sort_by: SortBy,

    /// Label language
    #[serde(default)]
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let options: ReportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ReportOptions::default());
        assert_eq!(options.sort_by, SortBy::Annualized);
        assert_eq!(options.max_records, 0);
    }

    #[test]
    fn test_partial_json() {
        let options: ReportOptions =
            serde_json::from_str(r#"{"max_records": 10, "sort_by": "monthly", "language": "es"}"#).unwrap();
        assert_eq!(options.max_records, 10);
        assert_eq!(options.sort_by, SortBy::Monthly);
        assert_eq!(options.language, Language::Es);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Alphabetical".parse::<SortBy>().unwrap(), SortBy::Alphabetical);
        assert!("biggest".parse::<SortBy>().is_err());
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Es);
        assert!("fr".parse::<Language>().is_err());
    }
}
