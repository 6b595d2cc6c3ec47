//! Per-agent aggregation and calendar-period filtering

mod agent;
mod period;

pub use agent::{AgentAggregate, aggregate_by_agent, ANNUALIZATION_FACTOR};
pub use period::{YearMonth, FilteredRows, filter_by_month, filter_by_range};
