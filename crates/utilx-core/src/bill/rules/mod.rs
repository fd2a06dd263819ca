//! Shared rule primitives used by every provider extractor.

pub mod amounts;
pub mod anchors;
pub mod dates;
pub mod patterns;

pub use amounts::{
    format_amount, parse_amount, parse_quantity, sum_amounts_on_lines_starting_with,
    sum_cubic_metre_lines,
};
pub use anchors::{
    contains_anchor, find_anchor, line_after, line_containing, normalize_line_endings,
    text_before, trimmed_lines,
};
pub use dates::{
    format_month_day_year, month_day_range, month_from_name, parse_day_month_short_year,
    parse_month_day, parse_month_day_short_year, parse_month_day_year, parse_month_year_range,
    parse_numeric_mdy, parse_year_month_day,
};
pub use patterns::{TimedRegex, DEFAULT_MATCH_BUDGET, MAX_HAYSTACK_BYTES};

/// Cut `text` at the first match of `terminator`, trimming the rest.
/// Text without a terminator is returned whole.
pub fn cut_at<'a>(text: &'a str, terminator: &TimedRegex) -> &'a str {
    match terminator.find(text) {
        Some(m) => text[..m.start()].trim(),
        None => text.trim(),
    }
}

/// `Some` for text that is not blank after trimming.
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
