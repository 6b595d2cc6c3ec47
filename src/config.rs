//! Report option loading
//!
//! Options come from an optional JSON file (every field defaulted), then from
//! `AGENT_PREMIUMS_*` environment variables. Command-line flags are applied last
//! by the binary.

use crate::error::Result;
use crate::report::ReportOptions;
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const ENV_MAX_RECORDS: &str = "AGENT_PREMIUMS_MAX_RECORDS";
pub const ENV_SORT: &str = "AGENT_PREMIUMS_SORT";
pub const ENV_LANGUAGE: &str = "AGENT_PREMIUMS_LANGUAGE";

/// Parse options from JSON text; missing fields take their defaults
pub fn options_from_json(text: &str) -> Result<ReportOptions> {
    Ok(serde_json::from_str(text)?)
}

/// Load options from an optional JSON file and the process environment
pub fn load_options(path: Option<&Path>) -> Result<ReportOptions> {
    let options = match path {
        Some(path) => {
            debug!("Reading report options from {}", path.display());
            options_from_json(&fs::read_to_string(path)?)?
        }
        None => ReportOptions::default(),
    };
    Ok(apply_env_overrides(options, |key| env::var(key).ok()))
}

/// Override options from environment-style lookups
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides<F>(mut options: ReportOptions, lookup: F) -> ReportOptions
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = parse_var(&lookup, ENV_MAX_RECORDS) {
        options.max_records = value;
    }
    if let Some(value) = parse_var(&lookup, ENV_SORT) {
        options.sort_by = value;
    }
    if let Some(value) = parse_var(&lookup, ENV_LANGUAGE) {
        options.language = value;
    }
    options
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Language, SortBy};
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_json() {
        let options = options_from_json(r#"{"max_records": 5, "sort_by": "monthly"}"#).unwrap();
        let vars: HashMap<&str, &str> = [(ENV_MAX_RECORDS, " 20 "), (ENV_LANGUAGE, "es")].into_iter().collect();

        let options = apply_env_overrides(options, |key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(options.max_records, 20);
        assert_eq!(options.sort_by, SortBy::Monthly);
        assert_eq!(options.language, Language::Es);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let vars: HashMap<&str, &str> = [(ENV_MAX_RECORDS, "lots"), (ENV_SORT, "random")].into_iter().collect();
        let options = apply_env_overrides(ReportOptions::default(), |key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(options, ReportOptions::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(options_from_json(r#"{"max_records": "ten"}"#).is_err());
        assert!(load_options(Some(Path::new("/nonexistent/options.json"))).is_err());
    }
}
