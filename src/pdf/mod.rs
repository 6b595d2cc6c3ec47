//! PDF export of an agent report and re-reading of its table
//!
//! The document is A4 landscape with a title block, a grid table of
//! team / agent / previous month / annualized premium and a totals row. The
//! header row repeats on every page.

mod encoding;
mod labels;
pub mod layout;
mod reader;
mod writer;

pub use reader::{read_table, ReportTable, TableRow, TableTotals};
pub use writer::{render_pdf, report_file_name, save_pdf, PdfContext};
