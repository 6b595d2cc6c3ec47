//! Submission row structure matching the carrier export format

use super::normalize::{full_name, name_key, parse_premium, parse_submit_date};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SUBMIT_DATE: &str = "Submit Date";
pub const AGENT_LAST_NAME: &str = "Writing Agent Last Name";
pub const AGENT_FIRST_NAME: &str = "Writing Agent First Name";
pub const PRODUCT: &str = "Product";
pub const PREMIUM_AMOUNT: &str = "Premium Amount";
pub const AGENT_NUMBER: &str = "Writing Agent Number";

/// Columns every submissions export must carry
pub const REQUIRED_COLUMNS: [&str; 5] = [
    SUBMIT_DATE,
    AGENT_LAST_NAME,
    AGENT_FIRST_NAME,
    PRODUCT,
    PREMIUM_AMOUNT,
];

/// A single submission record as exported, fields kept as free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    /// Submit date as written in the export
    pub submit_date: String,

    /// Writing agent first name
    pub first_name: String,

    /// Writing agent last name
    pub last_name: String,

    /// Product name
    pub product: String,

    /// Premium amount as written, e.g. "$1,200.00"
    pub premium_amount: String,

    /// Writing agent number, when the export carries that column
    #[serde(default)]
    pub agent_number: Option<String>,

    /// Every other column, in header order
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl SubmissionRow {
    /// Create a row from the five required fields
    pub fn new(
        submit_date: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        product: impl Into<String>,
        premium_amount: impl Into<String>,
    ) -> Self {
        Self {
            submit_date: submit_date.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            product: product.into(),
            premium_amount: premium_amount.into(),
            agent_number: None,
            extra: Vec::new(),
        }
    }

    /// Attach a writing agent number
    pub fn with_agent_number(mut self, agent_number: impl Into<String>) -> Self {
        self.agent_number = Some(agent_number.into());
        self
    }

    /// Title-cased "First Last" display name (empty when both parts are blank)
    pub fn agent_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    /// Lower-cased display name used for grouping
    pub fn agent_key(&self) -> String {
        name_key(&self.agent_name())
    }

    /// Normalized submit date, `None` when unparseable
    pub fn submitted_at(&self) -> Option<NaiveDateTime> {
        parse_submit_date(&self.submit_date)
    }

    /// Normalized premium, zero when unparseable
    pub fn premium(&self) -> Decimal {
        parse_premium(&self.premium_amount)
    }

    /// Trimmed product name
    pub fn product_name(&self) -> &str {
        self.product.trim()
    }

    /// Trimmed agent number, `None` when missing or blank
    pub fn agent_number(&self) -> Option<&str> {
        self.agent_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}
