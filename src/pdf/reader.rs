//! Re-read the summary table from a rendered report
//!
//! Text runs are grouped into lines by baseline and ordered left to right. Lines
//! after a recognized header row are table rows; the bold totals row is the one
//! starting with `TOTAL` and missing the agent-name cell. A run inside an
//! `/ActualText` span reads as the span's text instead of its glyph bytes.

use super::encoding::{decode_text_string, decode_win_ansi};
use super::labels::Labels;
use crate::error::{ReportError, Result};
use crate::submission::normalize::parse_amount;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One agent line as printed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub team: String,
    pub agent_name: String,
    /// `None` when the cell shows `-`
    pub previous: Option<Decimal>,
    pub annualized: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableTotals {
    pub previous: Decimal,
    pub annualized: Decimal,
}

/// The table of a rendered report, rows in print order across pages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTable {
    pub rows: Vec<TableRow>,
    pub totals: Option<TableTotals>,
}

/// Extract the table from PDF bytes
pub fn read_table(bytes: &[u8]) -> Result<ReportTable> {
    let doc = Document::load_mem(bytes)?;
    let labels = Labels::all();

    let mut table = ReportTable::default();
    let mut found_header = false;
    for (page_number, page_id) in doc.get_pages() {
        let content = Content::decode(&doc.get_page_content(page_id)?)?;
        let mut in_table = false;

        for cells in text_lines(&content.operations) {
            if labels.iter().any(|l| cells.iter().map(String::as_str).eq(l.headers)) {
                in_table = true;
                found_header = true;
                continue;
            }
            if !in_table {
                continue;
            }

            match cells.as_slice() {
                [team, name, previous, annualized] => table.rows.push(TableRow {
                    team: team.clone(),
                    agent_name: name.clone(),
                    previous: parse_cell(previous),
                    annualized: parse_amount_cell(annualized),
                }),
                [label, previous, annualized] if labels.iter().any(|l| l.total == label.as_str()) => {
                    table.totals = Some(TableTotals {
                        previous: parse_amount_cell(previous),
                        annualized: parse_amount_cell(annualized),
                    })
                }
                other => debug!("Ignoring line on page {}: {:?}", page_number, other),
            }
        }
    }

    if !found_header {
        return Err(ReportError::MissingTable);
    }
    Ok(table)
}

fn parse_cell(text: &str) -> Option<Decimal> {
    if text.trim() == "-" {
        None
    } else {
        Some(parse_amount_cell(text))
    }
}

// Printed amounts are already annualized, so no range check against the factor
fn parse_amount_cell(text: &str) -> Decimal {
    parse_amount(text).unwrap_or(Decimal::ZERO)
}

/// Text runs grouped into lines, top to bottom, each line left to right
fn text_lines(operations: &[Operation]) -> Vec<Vec<String>> {
    // Baselines keyed in tenths of a point
    let mut lines: BTreeMap<i64, Vec<(f32, String)>> = BTreeMap::new();
    let (mut x, mut y) = (0.0f32, 0.0f32);
    let mut actual_text: Option<String> = None;

    for op in operations {
        match op.operator.as_str() {
            "BT" => {
                x = 0.0;
                y = 0.0;
            }
            "Td" | "TD" => {
                if let [dx, dy] = op.operands.as_slice() {
                    x += dx.as_float().unwrap_or(0.0);
                    y += dy.as_float().unwrap_or(0.0);
                }
            }
            "Tm" => {
                if let [.., e, f] = op.operands.as_slice() {
                    x = e.as_float().unwrap_or(0.0);
                    y = f.as_float().unwrap_or(0.0);
                }
            }
            "BDC" => actual_text = op.operands.iter().find_map(span_actual_text),
            "EMC" => actual_text = None,
            "Tj" | "TJ" => {
                let text = match actual_text.take() {
                    Some(text) => text,
                    None => op.operands.iter().map(decode_text).collect::<String>(),
                };
                if !text.is_empty() {
                    let key = (y * 10.0).round() as i64;
                    lines.entry(key).or_default().push((x, text));
                }
            }
            _ => {}
        }
    }

    lines
        .into_values()
        .rev()
        .map(|mut runs| {
            runs.sort_by(|a, b| a.0.total_cmp(&b.0));
            runs.into_iter().map(|(_, text)| text).collect()
        })
        .collect()
}

fn span_actual_text(operand: &Object) -> Option<String> {
    match operand.as_dict().ok()?.get(b"ActualText").ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// WinAnsi string operands as text; arrays (from `TJ`) are concatenated
fn decode_text(object: &Object) -> String {
    match object {
        Object::String(bytes, _) => decode_win_ansi(bytes),
        Object::Array(items) => items.iter().map(decode_text).collect(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{render_pdf, PdfContext};
    use crate::report::{build_report, FilterState, Language, ReportOptions, TimePeriod};
    use crate::submission::{SubmissionRow, SubmissionSet};
    use crate::team::TeamAssignment;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn context(language: Language) -> PdfContext {
        let generated_at = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        PdfContext { language, generated_at }
    }

    fn january() -> FilterState {
        FilterState { period: TimePeriod::month(2025, 0).unwrap(), ..Default::default() }
    }

    #[test]
    fn test_round_trip_rows_and_totals() {
        let submissions = SubmissionSet::new(vec![
            SubmissionRow::new("1/5/2025", "jane", "doe", "A", "$100.00").with_agent_number("J1"),
            SubmissionRow::new("1/20/2025", "Jane", "Doe", "B", "$50").with_agent_number("J1"),
            SubmissionRow::new("1/7/2025", "José", "Peña", "A", "1,250.5"),
            SubmissionRow::new("12/3/2024", "Jane", "Doe", "A", "$10").with_agent_number("J1"),
        ]);
        let teams: TeamAssignment = [("J1", "North")].into_iter().collect();
        let report = build_report(&submissions, &teams, &january(), &ReportOptions::default(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let bytes = render_pdf(&report, &context(Language::En)).unwrap();
        let table = read_table(&bytes).unwrap();

        let expected: Vec<(String, String, Option<Decimal>, Decimal)> = report
            .rows
            .iter()
            .map(|r| {
                (r.team.clone(), r.aggregate.agent_name.clone(), r.previous_annualized, r.aggregate.annualized_premium)
            })
            .collect();
        let actual: Vec<_> = table
            .rows
            .iter()
            .map(|r| (r.team.clone(), r.agent_name.clone(), r.previous, r.annualized))
            .collect();
        assert_eq!(actual, expected);

        assert_eq!(table.rows[0].agent_name, "José Peña");
        assert_eq!(table.rows[0].annualized, dec("15006"));
        assert_eq!(table.rows[0].team, "NO TEAM");
        assert_eq!(table.rows[1].previous, Some(dec("120")));

        let totals = table.totals.unwrap();
        assert_eq!(totals.previous, dec("120"));
        assert_eq!(totals.annualized, dec("16806"));
    }

    #[test]
    fn test_round_trip_across_pages_in_spanish() {
        let rows = (0..80)
            .map(|i| SubmissionRow::new("1/10/2025", &format!("Agent{:02}", i), "Smith", "A", &format!("{}", 1000 - i)))
            .collect();
        let submissions = SubmissionSet::new(rows);
        let report = build_report(&submissions, &TeamAssignment::new(), &january(), &ReportOptions::default(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let bytes = render_pdf(&report, &context(Language::Es)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 3);

        let table = read_table(&bytes).unwrap();
        assert_eq!(table.rows.len(), 80);
        assert_eq!(table.rows[0].agent_name, "Agent00 Smith");
        assert_eq!(table.rows[79].agent_name, "Agent79 Smith");
        assert!(table.rows.iter().all(|r| r.previous.is_none()));
        assert_eq!(table.totals.unwrap().annualized, report.total_annualized);
    }

    #[test]
    fn test_empty_report_still_has_header_and_totals() {
        let report = build_report(&SubmissionSet::default(), &TeamAssignment::new(), &january(), &ReportOptions::default(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        let table = read_table(&render_pdf(&report, &context(Language::En)).unwrap()).unwrap();

        assert!(table.rows.is_empty());
        assert_eq!(table.totals, Some(TableTotals { previous: Decimal::ZERO, annualized: Decimal::ZERO }));
    }

    #[test]
    fn test_round_trip_names_outside_win_ansi() {
        let submissions = SubmissionSet::new(vec![
            SubmissionRow::new("1/5/2025", "Łukasz", "Dvořák", "A", "$300").with_agent_number("L1"),
            SubmissionRow::new("1/6/2025", "李", "王", "A", "$200"),
            SubmissionRow::new("1/7/2025", "Zoë", "Œuvre", "A", "$100"),
        ]);
        let teams: TeamAssignment = [("L1", "Équipe Nord")].into_iter().collect();
        let report = build_report(&submissions, &teams, &january(), &ReportOptions::default(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let bytes = render_pdf(&report, &context(Language::En)).unwrap();
        let table = read_table(&bytes).unwrap();

        let names: Vec<&str> = table.rows.iter().map(|r| r.agent_name.as_str()).collect();
        assert_eq!(names, vec!["Łukasz Dvořák", "李 王", "Zoë Œuvre"]);
        assert_eq!(table.rows[0].team, "Équipe Nord");
        assert_eq!(table.rows[1].annualized, dec("2400"));
    }

    #[test]
    fn test_saturated_totals_read_back() {
        let rows = (0..3)
            .map(|i| SubmissionRow::new("1/10/2025", &format!("Agent{}", i), "Smith", "A", "6000000000000000000000000000"))
            .collect();
        let report = build_report(&SubmissionSet::new(rows), &TeamAssignment::new(), &january(), &ReportOptions::default(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(report.total_annualized, Decimal::MAX);

        let table = read_table(&render_pdf(&report, &context(Language::En)).unwrap()).unwrap();
        assert_eq!(table.totals.unwrap().annualized, Decimal::MAX);
        assert!(table.rows.iter().all(|r| r.annualized == dec("72000000000000000000000000000")));
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert!(read_table(b"not a pdf").is_err());
    }
}
