//! Agent Premiums - premium reporting from policy submission exports
//!
//! This library provides:
//! - Submission CSV loading with required-column validation
//! - Date and currency normalization for loosely formatted exports
//! - Per-agent aggregation with monthly and annualized premiums
//! - Period, agent, product, team and search filters with previous-month comparison
//! - Team assignment from an agent-number mapping file
//! - Paginated PDF summaries, and re-reading of their tables

pub mod error;
pub mod submission;
pub mod aggregate;
pub mod team;
pub mod report;
pub mod pdf;
pub mod config;

// Re-export commonly used types
pub use error::{IngestIssue, ReportError, Result};
pub use submission::{SubmissionCatalog, SubmissionRow, SubmissionSet, ParsedSubmissions};
pub use aggregate::{AgentAggregate, YearMonth};
pub use team::{TeamAssignment, NO_TEAM};
pub use report::{
    build_report, AgentReport, DisplayRow, FilterState, Language, ReportOptions, ReportPeriod, SortBy,
    TeamFilter, TimePeriod,
};
pub use pdf::{read_table, render_pdf, PdfContext, ReportTable};
