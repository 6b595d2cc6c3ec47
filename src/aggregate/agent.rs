//! Per-agent premium aggregation

use crate::submission::SubmissionRow;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Months per year used to annualize a monthly premium
pub const ANNUALIZATION_FACTOR: i64 = 12;

/// Premium totals for one writing agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAggregate {
    /// Title-cased display name
    pub agent_name: String,

    /// Sum of parsed premiums
    pub monthly_premium: Decimal,

    /// Sum of parsed premiums × 12, accumulated per row; saturates at `Decimal::MAX`
    pub annualized_premium: Decimal,

    /// Distinct products in first-seen order
    pub products: Vec<String>,

    /// Occurrences per product; always the same key set as `products`
    pub product_counts: BTreeMap<String, usize>,
}

impl AgentAggregate {
    /// Create an empty aggregate for a display name
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            monthly_premium: Decimal::ZERO,
            annualized_premium: Decimal::ZERO,
            products: Vec::new(),
            product_counts: BTreeMap::new(),
        }
    }

    /// Lower-cased name used for case-insensitive lookups
    pub fn key(&self) -> String {
        self.agent_name.to_lowercase()
    }

    /// Add one submission's premium and product
    ///
    /// Empty products are neither listed nor counted.
    pub fn record(&mut self, premium: Decimal, product: &str) {
        // Sums saturate at the Decimal range instead of panicking
        let annualized = premium.saturating_mul(Decimal::from(ANNUALIZATION_FACTOR));
        self.monthly_premium = self.monthly_premium.saturating_add(premium);
        self.annualized_premium = self.annualized_premium.saturating_add(annualized);

        if product.is_empty() {
            return;
        }
        let count = self.product_counts.entry(product.to_string()).or_insert(0);
        if *count == 0 {
            self.products.push(product.to_string());
        }
        *count += 1;
    }

    /// Total number of submissions carrying a product
    pub fn submission_count(&self) -> usize {
        self.product_counts.values().sum()
    }
}

/// Group rows by agent and total their premiums
///
/// Rows with a blank name are ignored. The result is sorted by annualized premium,
/// highest first; ties keep first-appearance order.
pub fn aggregate_by_agent<'a, I>(rows: I) -> Vec<AgentAggregate>
where
    I: IntoIterator<Item = &'a SubmissionRow>,
{
    let mut aggregates: Vec<AgentAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = row.agent_name();
        if name.is_empty() {
            continue;
        }

        let slot = *index.entry(name.to_lowercase()).or_insert_with(|| {
            aggregates.push(AgentAggregate::new(name.clone()));
            aggregates.len() - 1
        });
        aggregates[slot].record(row.premium(), row.product_name());
    }

    // Vec::sort_by is stable
    aggregates.sort_by(|a, b| b.annualized_premium.cmp(&a.annualized_premium));
    debug!("Aggregated {} agents", aggregates.len());
    aggregates
}
