//! Money and quantity normalization.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::anchors::trimmed_lines;
use super::patterns::{TRAILING_AMOUNT, TRAILING_CM};

/// Parse a printed money amount ("$1,045.02", "-$45.10", "161.33").
///
/// Currency symbols, thousands separators and inner whitespace are dropped;
/// a leading minus (before or after the `$`) is kept. The result is rounded
/// to cents. Anything else yields `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let negative = trimmed
        .trim_start_matches(|c: char| c == '$' || c.is_whitespace())
        .starts_with('-');

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '-') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let mut value = Decimal::from_str(&cleaned).ok()?.round_dp(2);
    value.rescale(2);
    Some(if negative { -value } else { value })
}

/// Parse a printed consumption quantity ("2,680.000", "188").
///
/// Thousands separators are dropped. Negative or non-numeric input
/// yields `None`.
pub fn parse_quantity(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Sum of the quantities on every line that ends in a cubic-metre suffix
/// (`"... 188 CM"`). `None` when no line carries the suffix.
pub fn sum_cubic_metre_lines(text: &str) -> Option<f64> {
    let mut seen = false;
    let mut total = 0.0;

    for line in trimmed_lines(text) {
        if let Some(value) = TRAILING_CM.capture_str(line) {
            seen = true;
            total += parse_quantity(value).unwrap_or(0.0);
        }
    }

    seen.then_some(total)
}

/// Sum of the trailing amounts on every line that starts with `prefix`
/// (case-insensitive). Lines without a trailing amount add nothing.
pub fn sum_amounts_on_lines_starting_with(text: &str, prefix: &str) -> Decimal {
    let prefix = prefix.to_ascii_lowercase();

    trimmed_lines(text)
        .filter(|line| line.to_ascii_lowercase().starts_with(&prefix))
        .filter_map(|line| TRAILING_AMOUNT.capture_str(line))
        .filter_map(parse_amount)
        .sum()
}

/// Format an amount with thousands separators ("1,045.02").
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((&s, "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}.{}", formatted, decimal_part)
}
