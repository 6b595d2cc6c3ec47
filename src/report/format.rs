//! Currency and period formatting for tables and PDFs

use super::options::Language;
use num_format::{Locale, ToFormattedString};
use rust_decimal::{Decimal, RoundingStrategy};

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// Format an amount as US dollars with two decimals, e.g. `$1,234.56` or `-$5.00`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    // The integer part of any Decimal fits in a u128
    let grouped = int_part
        .parse::<u128>()
        .map(|value| value.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int_part.to_string());

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// Full month name for a zero-based month
pub fn month_name(month0: u32, language: Language) -> &'static str {
    let names = match language {
        Language::En => &MONTHS_EN,
        Language::Es => &MONTHS_ES,
    };
    names.get(month0 as usize).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec("0")), "$0.00");
        assert_eq!(format_currency(dec("1800")), "$1,800.00");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_currency(dec("0.005")), "$0.01");
        assert_eq!(format_currency(dec("-42.5")), "-$42.50");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_format_currency_beyond_u64() {
        assert_eq!(format_currency(dec("100000000000000000000")), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(Decimal::MAX), "$79,228,162,514,264,337,593,543,950,335.00");
        assert_eq!(format_currency(Decimal::MIN), "-$79,228,162,514,264,337,593,543,950,335.00");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(0, Language::En), "January");
        assert_eq!(month_name(11, Language::Es), "diciembre");
        assert_eq!(month_name(12, Language::En), "");
    }
}
