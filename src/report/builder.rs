//! Report assembly: filter, aggregate, enrich, sort, cap
//!
//! [`build_report`] is a pure function of the uploaded rows, the team mapping, the
//! filter selection, the presentation options and the current date. Every call
//! starts again from the original rows, so filters never compound.

use super::filters::{FilterState, ResolvedPeriod};
use super::format::month_name;
use super::options::{Language, ReportOptions, SortBy};
use crate::aggregate::{aggregate_by_agent, filter_by_month, filter_by_range, AgentAggregate, YearMonth};
use crate::submission::SubmissionSet;
use crate::team::TeamAssignment;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The period a report covers, as shown in titles and file names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportPeriod {
    Month(YearMonth),
    Range { from: NaiveDateTime, to: NaiveDateTime },
    /// No date bound; `year` is the year the report was built in
    AllTime { year: i32 },
}

impl ReportPeriod {
    fn from_resolved(resolved: ResolvedPeriod, today: NaiveDate) -> Self {
        match resolved {
            ResolvedPeriod::Month(month) => ReportPeriod::Month(month),
            ResolvedPeriod::Range(from, to) => ReportPeriod::Range { from, to },
            ResolvedPeriod::Unbounded => ReportPeriod::AllTime { year: today.year() },
        }
    }

    /// Human-readable label, e.g. "January 2025"
    pub fn label(&self, language: Language) -> String {
        match self {
            ReportPeriod::Month(month) => format!("{} {}", month_name(month.month0, language), month.year),
            ReportPeriod::Range { from, to } => {
                format!("{} - {}", from.format("%m/%d/%Y"), to.format("%m/%d/%Y"))
            }
            ReportPeriod::AllTime { .. } => match language {
                Language::En => "All Time".to_string(),
                Language::Es => "Todo el periodo".to_string(),
            },
        }
    }

    /// Year and zero-padded month used in file names; "00" for all time
    pub fn file_stamp(&self) -> (i32, String) {
        match self {
            ReportPeriod::Month(month) => (month.year, format!("{:02}", month.month_number())),
            ReportPeriod::Range { from, .. } => (from.year(), format!("{:02}", from.month())),
            ReportPeriod::AllTime { year } => (*year, "00".to_string()),
        }
    }
}

/// One agent's line in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    #[serde(flatten)]
    pub aggregate: AgentAggregate,

    /// Agent number from the first row for this agent
    pub agent_number: Option<String>,

    /// Resolved team, `NO TEAM` when unknown
    pub team: String,

    /// Annualized premium in the preceding month; `None` = no activity then
    pub previous_annualized: Option<Decimal>,
}

/// Everything needed to show or export a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub period: ReportPeriod,
    pub rows: Vec<DisplayRow>,

    /// Rows excluded from the date filter because their date did not parse
    pub skipped_rows: usize,

    pub total_monthly: Decimal,
    pub total_annualized: Decimal,
    /// Sum of known previous-month premiums (unknown counts as zero)
    pub total_previous: Decimal,

    /// Agents before truncation and team filtering
    pub total_records: usize,
    /// Agents actually shown
    pub displayed_records: usize,

    /// Size of the agent selection, zero when no agent filter is active
    pub selected_agents: usize,
}

/// Build a report from the original rows
///
/// Order: date, agents, products, search, aggregate, team and previous month,
/// sort, truncate, then the team filter. Truncating before the team filter keeps
/// "top N" tied to the overall ranking.
pub fn build_report(
    submissions: &SubmissionSet,
    teams: &TeamAssignment,
    filters: &FilterState,
    options: &ReportOptions,
    today: NaiveDate,
) -> AgentReport {
    let rows = submissions.rows();
    let resolved = filters.period.resolve(today);
    debug!("Building report for {:?} with {:?}", resolved, filters);

    let dated = match resolved {
        ResolvedPeriod::Month(month) => filter_by_month(rows, Some(month)),
        ResolvedPeriod::Range(from, to) => filter_by_range(rows, from, to),
        ResolvedPeriod::Unbounded => filter_by_month(rows, None),
    };

    let selected = dated
        .rows
        .iter()
        .copied()
        .filter(|row| filters.keeps_agent(row))
        .filter(|row| filters.keeps_product(row))
        .filter(|row| filters.keeps_search(row));
    let aggregates = aggregate_by_agent(selected);

    let previous = previous_month_premiums(submissions, resolved.previous_month());

    let mut display: Vec<DisplayRow> = aggregates
        .into_iter()
        .map(|aggregate| {
            let agent_number = submissions.agent_number(&aggregate.agent_name).map(str::to_string);
            let team = teams.team_for(agent_number.as_deref()).to_string();
            let previous_annualized = previous.as_ref().and_then(|p| p.get(&aggregate.key()).copied());
            DisplayRow { aggregate, agent_number, team, previous_annualized }
        })
        .collect();

    sort_rows(&mut display, options.sort_by);
    let total_records = display.len();

    if options.max_records > 0 {
        display.truncate(options.max_records);
    }
    display.retain(|row| filters.team.matches(&row.team));

    let total_monthly = saturating_sum(display.iter().map(|r| r.aggregate.monthly_premium));
    let total_annualized = saturating_sum(display.iter().map(|r| r.aggregate.annualized_premium));
    let total_previous = saturating_sum(display.iter().filter_map(|r| r.previous_annualized));

    let report = AgentReport {
        period: ReportPeriod::from_resolved(resolved, today),
        displayed_records: display.len(),
        rows: display,
        skipped_rows: dated.skipped_rows,
        total_monthly,
        total_annualized,
        total_previous,
        total_records,
        selected_agents: filters.agents.len(),
    };
    info!(
        "Report for {}: {} of {} agents, annualized {}",
        report.period.label(options.language),
        report.displayed_records,
        report.total_records,
        report.total_annualized
    );
    report
}

fn saturating_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Annualized premium per lower-cased agent name over the whole export
fn previous_month_premiums(
    submissions: &SubmissionSet,
    month: Option<YearMonth>,
) -> Option<HashMap<String, Decimal>> {
    let month = month?;
    let filtered = filter_by_month(submissions.rows(), Some(month));
    let lookup = aggregate_by_agent(filtered.rows)
        .into_iter()
        .map(|a| (a.key(), a.annualized_premium))
        .collect();
    Some(lookup)
}

fn sort_rows(rows: &mut [DisplayRow], sort_by: SortBy) {
    match sort_by {
        SortBy::Annualized => {
            rows.sort_by(|a, b| b.aggregate.annualized_premium.cmp(&a.aggregate.annualized_premium))
        }
        SortBy::Monthly => rows.sort_by(|a, b| b.aggregate.monthly_premium.cmp(&a.aggregate.monthly_premium)),
        SortBy::Alphabetical => rows.sort_by(|a, b| {
            let (a, b) = (&a.aggregate.agent_name, &b.aggregate.agent_name);
            a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
        }),
        SortBy::Aggregated => {}
    }
}
