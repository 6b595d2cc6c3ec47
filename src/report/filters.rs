//! User filter selections

use crate::aggregate::YearMonth;
use crate::submission::SubmissionRow;
use crate::team::NO_TEAM;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Time period selector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum TimePeriod {
    /// The calendar month containing "today"
    #[default]
    CurrentMonth,
    /// No date bound
    AllTime,
    /// A specific calendar month
    Month(YearMonth),
    /// Inclusive range; only honored when both ends are set
    Custom {
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    },
}

/// A time period with "today" and incomplete ranges resolved away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPeriod {
    Month(YearMonth),
    Range(NaiveDateTime, NaiveDateTime),
    Unbounded,
}

impl TimePeriod {
    /// A specific calendar month, `None` if `month0` is out of range
    pub fn month(year: i32, month0: u32) -> Option<Self> {
        YearMonth::new(year, month0).map(TimePeriod::Month)
    }

    pub fn resolve(&self, today: NaiveDate) -> ResolvedPeriod {
        match self {
            TimePeriod::CurrentMonth => ResolvedPeriod::Month(YearMonth::of(&today)),
            TimePeriod::AllTime => ResolvedPeriod::Unbounded,
            TimePeriod::Month(month) => ResolvedPeriod::Month(*month),
            TimePeriod::Custom { from: Some(from), to: Some(to) } => ResolvedPeriod::Range(*from, *to),
            TimePeriod::Custom { .. } => ResolvedPeriod::Unbounded,
        }
    }
}

impl ResolvedPeriod {
    /// Month preceding the period, used for the previous-month comparison
    ///
    /// A range compares against the month before its start; unbounded has none.
    pub fn previous_month(&self) -> Option<YearMonth> {
        match self {
            ResolvedPeriod::Month(month) => Some(month.previous()),
            ResolvedPeriod::Range(from, _) => Some(YearMonth::of(from).previous()),
            ResolvedPeriod::Unbounded => None,
        }
    }
}

/// Team selector, applied after truncation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamFilter {
    #[default]
    All,
    Team(String),
}

impl TeamFilter {
    /// No selection, or a blank one, keeps every team; any label is taken literally
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            Some(label) if !label.is_empty() => TeamFilter::Team(label.to_string()),
            _ => TeamFilter::All,
        }
    }

    pub fn matches(&self, team: &str) -> bool {
        match self {
            TeamFilter::All => true,
            TeamFilter::Team(selected) if selected == NO_TEAM => team.is_empty() || team == NO_TEAM,
            TeamFilter::Team(selected) => selected == team,
        }
    }
}

/// Every filter the user can set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub period: TimePeriod,

    /// Display names ("Jane Doe"); empty = every agent
    #[serde(default)]
    pub agents: BTreeSet<String>,

    /// Product names; empty = every product
    #[serde(default)]
    pub products: BTreeSet<String>,

    #[serde(default)]
    pub team: TeamFilter,

    /// Free-text name search; blank = no search
    #[serde(default)]
    pub search: String,
}

impl FilterState {
    /// Agent-set filter: exact match on the title-cased display name
    pub(crate) fn keeps_agent(&self, row: &SubmissionRow) -> bool {
        self.agents.is_empty() || self.agents.contains(&row.agent_name())
    }

    /// Product-set filter: exact match on the trimmed product; blank products never match
    pub(crate) fn keeps_product(&self, row: &SubmissionRow) -> bool {
        if self.products.is_empty() {
            return true;
        }
        let product = row.product_name();
        !product.is_empty() && self.products.contains(product)
    }

    /// Search filter: lower-cased display name contains the lower-cased term
    pub(crate) fn keeps_search(&self, row: &SubmissionRow) -> bool {
        if self.search.trim().is_empty() {
            return true;
        }
        row.agent_name().to_lowercase().contains(&self.search.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_periods() {
        let today = day(2025, 1, 15);
        assert_eq!(
            TimePeriod::CurrentMonth.resolve(today),
            ResolvedPeriod::Month(YearMonth::new(2025, 0).unwrap())
        );
        assert_eq!(TimePeriod::AllTime.resolve(today), ResolvedPeriod::Unbounded);

        let from = day(2025, 3, 10).and_hms_opt(0, 0, 0).unwrap();
        let half_open = TimePeriod::Custom { from: Some(from), to: None };
        assert_eq!(half_open.resolve(today), ResolvedPeriod::Unbounded);
        assert_eq!(half_open.resolve(today).previous_month(), None);
    }

    #[test]
    fn test_previous_month_of_current_january() {
        let resolved = TimePeriod::CurrentMonth.resolve(day(2025, 1, 2));
        assert_eq!(resolved.previous_month(), YearMonth::new(2024, 11));
    }

    #[test]
    fn test_previous_month_of_range_uses_start() {
        let from = day(2025, 3, 10).and_hms_opt(0, 0, 0).unwrap();
        let to = day(2025, 5, 1).and_hms_opt(0, 0, 0).unwrap();
        let resolved = TimePeriod::Custom { from: Some(from), to: Some(to) }.resolve(day(2025, 6, 1));
        assert_eq!(resolved.previous_month(), YearMonth::new(2025, 1));
    }

    #[test]
    fn test_team_filter() {
        assert_eq!(TeamFilter::from_selection(None), TeamFilter::All);
        assert_eq!(TeamFilter::from_selection(Some("  ")), TeamFilter::All);
        assert!(TeamFilter::All.matches("North"));

        let north = TeamFilter::from_selection(Some(" North "));
        assert!(north.matches("North"));
        assert!(!north.matches("north"));

        let none = TeamFilter::from_selection(Some(NO_TEAM));
        assert!(none.matches(NO_TEAM));
        assert!(!none.matches("North"));
    }

    #[test]
    fn test_team_labelled_all_is_selectable() {
        let all_team = TeamFilter::from_selection(Some("All"));
        assert_eq!(all_team, TeamFilter::Team("All".to_string()));
        assert!(all_team.matches("All"));
        assert!(!all_team.matches("North"));
    }

    #[test]
    fn test_row_filters() {
        let row = SubmissionRow::new("1/5/2025", "jane", "doe", " Term ", "1");
        let mut filters = FilterState::default();
        assert!(filters.keeps_agent(&row) && filters.keeps_product(&row) && filters.keeps_search(&row));

        filters.agents.insert("Jane Doe".to_string());
        filters.products.insert("Term".to_string());
        filters.search = "  ".to_string();
        assert!(filters.keeps_agent(&row) && filters.keeps_product(&row) && filters.keeps_search(&row));

        filters.search = "E D".to_string();
        assert!(filters.keeps_search(&row));
        filters.search = "smith".to_string();
        assert!(!filters.keeps_search(&row));

        let blank_product = SubmissionRow::new("1/5/2025", "Jane", "Doe", "", "1");
        assert!(!filters.keeps_product(&blank_product));
    }
}
