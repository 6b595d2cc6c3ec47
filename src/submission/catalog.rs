//! Filter choices derived from a submissions export

use super::SubmissionRow;
use crate::aggregate::YearMonth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Months, agents and products present in an export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCatalog {
    /// Months with at least one parseable submit date, oldest first
    pub available_months: Vec<YearMonth>,

    /// Distinct display names, sorted
    pub agents: Vec<String>,

    /// Distinct trimmed product names, sorted
    pub products: Vec<String>,
}

impl SubmissionCatalog {
    pub fn from_rows(rows: &[SubmissionRow]) -> Self {
        let mut months = BTreeSet::new();
        let mut agents = BTreeSet::new();
        let mut products = BTreeSet::new();

        for row in rows {
            if let Some(date) = row.submitted_at() {
                months.insert(YearMonth::of(&date));
            }

            let name = row.agent_name();
            if !name.is_empty() {
                agents.insert(name);
            }

            let product = row.product_name();
            if !product.is_empty() {
                products.insert(product.to_string());
            }
        }

        Self {
            available_months: months.into_iter().collect(),
            agents: agents.into_iter().collect(),
            products: products.into_iter().collect(),
        }
    }
}
