//! Normalization of free-text submission fields
//!
//! Submission exports are hand-edited spreadsheets, so dates, amounts and names
//! arrive in inconsistent shapes. Everything here is total: no function panics or
//! returns an error, bad input maps to `None` (dates) or zero (premiums).

use crate::aggregate::ANNUALIZATION_FACTOR;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Date-time layouts tried before falling back to strict M/D/Y splitting
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Date-only layouts; these resolve to midnight
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Years below this are treated as misparsed two-digit years
const MIN_GENERAL_YEAR: i32 = 1000;

/// Two-digit years below this land in the 2000s, the rest in the 1900s
const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

/// Parse a submit date into a naive local date-time
///
/// Tries the common layouts first, then `m/d/yy` with two-digit years pivoting at
/// 50, then strict `month/day/year` with month in [1, 12], day in [1, 31] and
/// year > 1900.
pub fn parse_submit_date(value: &str) -> Option<NaiveDateTime> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return None;
    }

    parse_general(cleaned)
        .or_else(|| parse_two_digit_year(cleaned))
        .or_else(|| parse_month_day_year(cleaned))
}

fn parse_general(s: &str) -> Option<NaiveDateTime> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })?;

    (parsed.year() >= MIN_GENERAL_YEAR).then_some(parsed)
}

/// `m/d/yy`, e.g. `1/5/25` -> 2025-01-05 and `1/5/75` -> 1975-01-05
fn parse_two_digit_year(s: &str) -> Option<NaiveDateTime> {
    let (date, year) = s.rsplit_once('/')?;
    if year.is_empty() || year.len() > 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let short: i32 = year.parse().ok()?;
    let year = if short < TWO_DIGIT_YEAR_PIVOT { 2000 + short } else { 1900 + short };

    NaiveDate::parse_from_str(&format!("{}/{}", date, year), "%m/%d/%Y")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn parse_month_day_year(s: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let month: u32 = parts[0].trim().parse().ok()?;
    let day: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || year <= 1900 {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a premium amount such as `"$1,234.50"`
///
/// Currency symbols, thousands separators and all whitespace are removed, then the
/// leading decimal number is read. Empty or non-numeric input yields zero, as
/// does an amount too large to annualize without overflowing.
pub fn parse_premium(value: &str) -> Decimal {
    parse_amount(value)
        .filter(|amount| amount.checked_mul(Decimal::from(ANNUALIZATION_FACTOR)).is_some())
        .unwrap_or(Decimal::ZERO)
}

/// Read a currency amount with the same cleanup as [`parse_premium`], with no
/// range limit; `None` when no number can be read
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect();

    leading_number(&cleaned).and_then(|number| {
        if number.contains(['e', 'E']) {
            Decimal::from_scientific(&number).ok()
        } else {
            Decimal::from_str(&number).ok().or_else(|| without_trailing_zeros(&number))
        }
    })
}

// Amounts near the Decimal limit only fit once redundant fraction digits are gone
fn without_trailing_zeros(number: &str) -> Option<Decimal> {
    if !number.contains('.') {
        return None;
    }
    Decimal::from_str(number.trim_end_matches('0').trim_end_matches('.')).ok()
}

/// Extract the longest numeric prefix, rewritten into a form `Decimal` accepts
fn leading_number(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = &s[frac_start..frac_end];
        pos = frac_end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut number = String::with_capacity(s.len() + 2);
    if negative {
        number.push('-');
    }
    number.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        number.push('.');
        number.push_str(frac_digits);
    }

    // Exponent only counts when at least one digit follows it
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp_end = pos + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            number.push('e');
            number.push_str(s[pos + 1..exp_end].trim_start_matches('+'));
        }
    }

    Some(number)
}

/// Title-case a name: lower-case everything, then upper-case the first letter of
/// each space-separated word
pub fn title_case(value: &str) -> String {
    value
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display name for an agent, e.g. `("jane ", "DOE")` -> `"Jane Doe"`
///
/// Empty when both parts are blank.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", title_case(first.trim()), title_case(last.trim()))
        .trim()
        .to_string()
}

/// Case-insensitive grouping key for a display name
pub fn name_key(display_name: &str) -> String {
    display_name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_common_date_layouts() {
        let d = parse_submit_date("1/5/2025").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 1, 5));

        let d = parse_submit_date("2025-03-14").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 3, 14));

        let d = parse_submit_date("  12/31/2024 ").unwrap();
        assert_eq!((d.year(), d.month0()), (2024, 11));

        let d = parse_submit_date("March 2, 2025").unwrap();
        assert_eq!((d.month(), d.day()), (3, 2));

        let d = parse_submit_date("2025-03-14T09:30:00").unwrap();
        assert_eq!(d.hour(), 9);
    }

    #[test]
    fn test_strict_fallback_tolerates_padding() {
        let d = parse_submit_date("01 / 07 / 2025").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 1, 7));
    }

    #[test]
    fn test_unparseable_dates_are_none() {
        assert!(parse_submit_date("").is_none());
        assert!(parse_submit_date("   ").is_none());
        assert!(parse_submit_date("not a date").is_none());
        assert!(parse_submit_date("13/01/2025").is_none());
        assert!(parse_submit_date("1/32/2025").is_none());
        assert!(parse_submit_date("1/5/025").is_none());
        assert!(parse_submit_date("2/30/25").is_none());
        assert!(parse_submit_date("2/30/2025").is_none());
        assert!(parse_submit_date("1/5").is_none());
    }

    #[test]
    fn test_two_digit_years_pivot_at_fifty() {
        let d = parse_submit_date("1/5/25").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 1, 5));

        let d = parse_submit_date("12/31/49").unwrap();
        assert_eq!(d.year(), 2049);

        let d = parse_submit_date("6/1/75").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1975, 6, 1));

        let d = parse_submit_date("3/9/05").unwrap();
        assert_eq!(d.year(), 2005);
    }

    #[test]
    fn test_parse_premium_rejects_amounts_that_cannot_be_annualized() {
        assert_eq!(parse_premium("1e28"), Decimal::ZERO);
        assert_eq!(parse_premium("79228162514264337593543950335"), Decimal::ZERO);
        assert_eq!(parse_premium("-1e28"), Decimal::ZERO);

        assert_eq!(parse_premium("6000000000000000000000000000"), dec("6000000000000000000000000000"));
        assert_eq!(parse_amount("$100,000,000,000,000,000,000.00"), Some(dec("100000000000000000000")));
        assert_eq!(parse_amount("1e28"), Some(dec("10000000000000000000000000000")));
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount("$79,228,162,514,264,337,593,543,950,335.00"), Some(Decimal::MAX));
    }

    #[test]
    fn test_parse_premium_strips_symbols_and_separators() {
        assert_eq!(parse_premium("$100.00"), dec("100.00"));
        assert_eq!(parse_premium("$1,234.56"), dec("1234.56"));
        assert_eq!(parse_premium("  $ 50 "), dec("50"));
        assert_eq!(parse_premium("-25.5"), dec("-25.5"));
        assert_eq!(parse_premium(".75"), dec("0.75"));
    }

    #[test]
    fn test_parse_premium_reads_leading_number() {
        assert_eq!(parse_premium("12abc"), dec("12"));
        assert_eq!(parse_premium("1e3"), dec("1000"));
        assert_eq!(parse_premium("2.5E-1"), dec("0.25"));
        assert_eq!(parse_premium("7e"), dec("7"));
    }

    #[test]
    fn test_parse_premium_defaults_to_zero() {
        assert_eq!(parse_premium(""), Decimal::ZERO);
        assert_eq!(parse_premium("N/A"), Decimal::ZERO);
        assert_eq!(parse_premium("$"), Decimal::ZERO);
        assert_eq!(parse_premium("-"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_premium_is_idempotent_on_clean_values() {
        for raw in ["$1,234.56", "$100", "2,000,000.10", "$ 0.99"] {
            let once = parse_premium(raw);
            let twice = parse_premium(&once.to_string());
            assert_eq!(once, twice, "normalizing {raw} twice changed the value");
        }
    }

    #[test]
    fn test_title_case_and_full_name() {
        assert_eq!(title_case("jOHN"), "John");
        assert_eq!(title_case("mary ann"), "Mary Ann");
        assert_eq!(title_case("o'neil"), "O'neil");
        assert_eq!(full_name("  jane", "DOE "), "Jane Doe");
        assert_eq!(full_name("", "smith"), "Smith");
        assert_eq!(full_name("", "  "), "");
        assert_eq!(name_key(&full_name("JOHN", "SMITH")), "john smith");
    }
}
