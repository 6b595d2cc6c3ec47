//! Load submissions from a CSV export
//!
//! Parsing never fails on content: missing columns and malformed rows are
//! reported as [`IngestIssue`]s alongside whatever rows could be read. Only I/O
//! failures and unsupported file types are hard errors.

use super::data::{SubmissionRow, AGENT_NUMBER, REQUIRED_COLUMNS};
use super::data::{AGENT_FIRST_NAME, AGENT_LAST_NAME, PREMIUM_AMOUNT, PRODUCT, SUBMIT_DATE};
use crate::error::{IngestIssue, ReportError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Rows read from an export plus every issue found along the way
#[derive(Debug, Clone, Default)]
pub struct ParsedSubmissions {
    pub rows: Vec<SubmissionRow>,
    pub issues: Vec<IngestIssue>,
}

impl ParsedSubmissions {
    /// The issue that blocks the whole file, if any
    pub fn blocking_issue(&self) -> Option<&IngestIssue> {
        self.issues.iter().find(|i| i.is_blocking())
    }

    /// Whether the rows can be reported on
    pub fn is_usable(&self) -> bool {
        self.blocking_issue().is_none()
    }

    /// Non-blocking issues (dropped rows)
    pub fn warnings(&self) -> impl Iterator<Item = &IngestIssue> {
        self.issues.iter().filter(|i| !i.is_blocking())
    }

    /// Human-readable messages for every issue
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Column positions resolved from the header row
///
/// Rows are mapped by position rather than deserialized with serde so that
/// unmodeled columns survive in `extra` and every absent required column is
/// reported at once.
struct ColumnMap {
    submit_date: usize,
    first_name: usize,
    last_name: usize,
    product: usize,
    premium_amount: usize,
    agent_number: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Resolve positions, or list the required columns that are absent
    fn resolve(headers: &[String]) -> std::result::Result<Self, Vec<String>> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| position(col).is_none())
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let mut map = Self {
            submit_date: position(SUBMIT_DATE).unwrap_or_default(),
            first_name: position(AGENT_FIRST_NAME).unwrap_or_default(),
            last_name: position(AGENT_LAST_NAME).unwrap_or_default(),
            product: position(PRODUCT).unwrap_or_default(),
            premium_amount: position(PREMIUM_AMOUNT).unwrap_or_default(),
            agent_number: position(AGENT_NUMBER),
            extra: Vec::new(),
        };

        let modeled = [
            Some(map.submit_date),
            Some(map.first_name),
            Some(map.last_name),
            Some(map.product),
            Some(map.premium_amount),
            map.agent_number,
        ];
        map.extra = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !modeled.contains(&Some(*idx)))
            .map(|(idx, name)| (idx, name.clone()))
            .collect();

        Ok(map)
    }

    fn to_row(&self, record: &StringRecord) -> SubmissionRow {
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        SubmissionRow {
            submit_date: field(self.submit_date),
            first_name: field(self.first_name),
            last_name: field(self.last_name),
            product: field(self.product),
            premium_amount: field(self.premium_amount),
            agent_number: self.agent_number.and_then(|idx| record.get(idx)).map(str::to_string),
            extra: self
                .extra
                .iter()
                .map(|(idx, name)| (name.clone(), field(*idx)))
                .collect(),
        }
    }
}

fn is_io(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(_))
}

/// A quoted field that swallowed following lines of the file
///
/// An unclosed quote runs to end of input, so later records end up inside one
/// field. Any continuation line holding a full row's worth of delimiters marks it.
fn runaway_quote(record: &StringRecord, width: usize) -> Option<IngestIssue> {
    let swallowed = record.iter().any(|field| {
        field
            .lines()
            .skip(1)
            .any(|line| line.split(',').count() >= width)
    });
    swallowed.then(|| IngestIssue::MalformedRow {
        line: record.position().map(|p| p.line()).unwrap_or(0),
        message: "unbalanced quote: field runs across following rows".to_string(),
    })
}

fn malformed(err: &csv::Error) -> IngestIssue {
    IngestIssue::MalformedRow {
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

/// Parse submissions from CSV text already in memory
pub fn parse_submissions(text: &str) -> ParsedSubmissions {
    match load_submissions_from_reader(text.as_bytes()) {
        Ok(parsed) => parsed,
        // Reading from a byte slice cannot fail with an I/O error
        Err(err) => ParsedSubmissions {
            rows: Vec::new(),
            issues: vec![IngestIssue::MalformedRow { line: 0, message: err.to_string() }],
        },
    }
}

/// Load submissions from any reader (e.g., file, string buffer)
pub fn load_submissions_from_reader<R: Read>(reader: R) -> Result<ParsedSubmissions> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = match csv_reader.headers() {
        Ok(record) => record.iter().map(|h| h.trim().to_string()).collect(),
        Err(err) if is_io(&err) => return Err(err.into()),
        Err(err) => {
            return Ok(ParsedSubmissions { rows: Vec::new(), issues: vec![malformed(&err)] });
        }
    };

    let columns = match ColumnMap::resolve(&headers) {
        Ok(columns) => columns,
        Err(missing) => {
            let issue = IngestIssue::MissingColumns(missing);
            warn!("{}", issue);
            return Ok(ParsedSubmissions { rows: Vec::new(), issues: vec![issue] });
        }
    };

    let mut parsed = ParsedSubmissions::default();
    for result in csv_reader.records() {
        match result {
            Ok(record) => match runaway_quote(&record, headers.len()) {
                Some(issue) => {
                    warn!("{}", issue);
                    parsed.issues.push(issue);
                }
                None => parsed.rows.push(columns.to_row(&record)),
            },
            Err(err) if is_io(&err) => return Err(err.into()),
            Err(err) => {
                let issue = malformed(&err);
                warn!("{}", issue);
                parsed.issues.push(issue);
            }
        }
    }

    info!(
        "Parsed {} submissions ({} malformed rows dropped)",
        parsed.rows.len(),
        parsed.issues.len()
    );
    Ok(parsed)
}

/// Load submissions from a `.csv` file on disk
pub fn load_submissions<P: AsRef<Path>>(path: P) -> Result<ParsedSubmissions> {
    let path = path.as_ref();
    ensure_csv_extension(path)?;
    let file = File::open(path)?;
    load_submissions_from_reader(file)
}

/// Reject paths that do not end in `.csv` (case-insensitive)
pub(crate) fn ensure_csv_extension(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ReportError::UnsupportedFileType(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Submit Date, Writing Agent Last Name ,Writing Agent First Name,Product,Premium Amount,Writing Agent Number,Carrier";

    #[test]
    fn test_parse_valid_export() {
        let text = format!(
            "{HEADER}\n1/5/2025,doe,jane,A,$100.00,A1,Acme\n1/20/2025,Doe,Jane,B,$50,A1,Acme\n"
        );
        let parsed = parse_submissions(&text);

        assert!(parsed.issues.is_empty(), "unexpected issues: {:?}", parsed.messages());
        assert_eq!(parsed.rows.len(), 2);

        let first = &parsed.rows[0];
        assert_eq!(first.last_name, "doe");
        assert_eq!(first.agent_number(), Some("A1"));
        assert_eq!(first.extra, vec![("Carrier".to_string(), "Acme".to_string())]);
    }

    #[test]
    fn test_unbalanced_quote_is_reported_not_swallowed() {
        let text = "Submit Date,Writing Agent Last Name,Writing Agent First Name,Product,Premium Amount\n\
                    1/5/2025,Doe,Jane,A,\"$100\n\
                    1/6/2025,Roe,Rick,B,$5\n\
                    1/7/2025,Poe,Cy,C,$7\n";
        let parsed = parse_submissions(text);

        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.issues.len(), 1);
        assert!(parsed.is_usable());
        match &parsed.issues[0] {
            IngestIssue::MalformedRow { line, message } => {
                assert_eq!(*line, 2);
                assert!(message.contains("unbalanced quote"));
            }
            other => panic!("unexpected issue: {:?}", other),
        }
    }

    #[test]
    fn test_multiline_quoted_field_is_kept() {
        let text = format!("{HEADER}\n1/5/2025,Doe,Jane,A,$100,A1,\"Acme\nSuite 4\"\n1/6/2025,Roe,Rick,B,$5,R1,Acme\n");
        let parsed = parse_submissions(&text);

        assert!(parsed.issues.is_empty(), "unexpected issues: {:?}", parsed.messages());
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].extra[0].1, "Acme\nSuite 4");
    }

    #[test]
    fn test_header_only_file_has_no_issues() {
        let parsed = parse_submissions(&format!("{HEADER}\n"));
        assert!(parsed.issues.is_empty());
        assert!(parsed.rows.is_empty());
        assert!(parsed.is_usable());
    }

    #[test]
    fn test_many_rows_have_no_structural_issues() {
        let mut text = format!("{HEADER}\n");
        for i in 0..500 {
            text.push_str(&format!("2/{}/2025,Agent{},Test,P{},\"$1,{:03}.00\",N{},X\n", i % 28 + 1, i % 7, i % 3, i, i));
        }
        let parsed = parse_submissions(&text);
        assert!(parsed.issues.is_empty());
        assert_eq!(parsed.rows.len(), 500);
    }

    #[test]
    fn test_missing_columns_block_file() {
        let text = "Submit Date,Product\n1/5/2025,A\n";
        let parsed = parse_submissions(text);

        assert!(parsed.rows.is_empty());
        assert!(!parsed.is_usable());
        assert_eq!(
            parsed.blocking_issue(),
            Some(&IngestIssue::MissingColumns(vec![
                "Writing Agent Last Name".to_string(),
                "Writing Agent First Name".to_string(),
                "Premium Amount".to_string(),
            ]))
        );
    }

    #[test]
    fn test_malformed_rows_are_dropped_with_warning() {
        let text = format!("{HEADER}\n1/5/2025,Doe,Jane,A,$100,A1,X\n1/6/2025,Roe\n1/7/2025,Roe,Rick,B,$5,A2,X\n");
        let parsed = parse_submissions(&text);

        assert!(parsed.is_usable());
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.warnings().count(), 1);
        match &parsed.issues[0] {
            IngestIssue::MalformedRow { line, .. } => assert_eq!(*line, 3),
            other => panic!("unexpected issue {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = format!("{HEADER}\n\n1/5/2025,Doe,Jane,A,$100,A1,X\n\n");
        let parsed = parse_submissions(&text);
        assert!(parsed.issues.is_empty());
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn test_rejects_non_csv_extension() {
        let err = load_submissions("submissions.xlsx").unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFileType(_)));
        assert!(ensure_csv_extension(Path::new("EXPORT.CSV")).is_ok());
    }
}
