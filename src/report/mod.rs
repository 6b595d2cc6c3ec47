//! Filter selection, presentation options and report assembly

mod builder;
mod filters;
mod format;
mod options;

pub use builder::{build_report, AgentReport, DisplayRow, ReportPeriod};
pub use filters::{FilterState, ResolvedPeriod, TeamFilter, TimePeriod};
pub use format::{format_currency, month_name};
pub use options::{Language, ReportOptions, SortBy};
