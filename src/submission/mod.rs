//! Submission rows, normalization and export loading

mod data;
mod catalog;
mod set;
pub mod loader;
pub mod normalize;

pub use data::{
    SubmissionRow, REQUIRED_COLUMNS, SUBMIT_DATE, AGENT_FIRST_NAME, AGENT_LAST_NAME,
    PRODUCT, PREMIUM_AMOUNT, AGENT_NUMBER,
};
pub use catalog::SubmissionCatalog;
pub use set::SubmissionSet;
pub use loader::{ParsedSubmissions, parse_submissions, load_submissions, load_submissions_from_reader};
