//! Date normalization for the formats printed on supported bills.
//!
//! Every parser returns `None` for tokens that do not form a real calendar
//! date; none of them panic on malformed input.

use chrono::{Months, NaiveDate};

use super::patterns::{
    DATE_DAY_MONTH_SHORT_YEAR, DATE_MONTH_DAY, DATE_MONTH_DAY_SHORT_YEAR, DATE_MONTH_DAY_YEAR,
    DATE_MONTH_YEAR, DATE_NUMERIC_MDY, DATE_YEAR_MONTH_DAY,
};

/// "Apr 6, 2025", "April 6, 2025", "Jun 02,2025".
///
/// The first such token found in `s` is used.
pub fn parse_month_day_year(s: &str) -> Option<NaiveDate> {
    let caps = DATE_MONTH_DAY_YEAR.captures(s)?;
    let month = month_from_name(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// "5/31/2021" (month first).
pub fn parse_numeric_mdy(s: &str) -> Option<NaiveDate> {
    let caps = DATE_NUMERIC_MDY.captures(s)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// "Apr 06/25".
pub fn parse_month_day_short_year(s: &str) -> Option<NaiveDate> {
    let caps = DATE_MONTH_DAY_SHORT_YEAR.captures(s)?;
    let month = month_from_name(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(parse_year(&caps[3])?, month, day)
}

/// "05-Apr-25".
pub fn parse_day_month_short_year(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DAY_MONTH_SHORT_YEAR.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    NaiveDate::from_ymd_opt(parse_year(&caps[3])?, month, day)
}

/// "2025 April 12".
pub fn parse_year_month_day(s: &str) -> Option<NaiveDate> {
    let caps = DATE_YEAR_MONTH_DAY.captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// "March 2025" expanded to the first and last day of that month.
pub fn parse_month_year_range(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    let caps = DATE_MONTH_YEAR.captures(s)?;
    let month = month_from_name(&caps[1])?;
    let year: i32 = caps[2].parse().ok()?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// "May 02" or "Mar6" in the given year.
pub fn parse_month_day(s: &str, year: i32) -> Option<NaiveDate> {
    let caps = DATE_MONTH_DAY.captures(s)?;
    let month = month_from_name(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolve a year-less "start to end" range. Both ends take `year`; when
/// the start then falls after the end the range crosses a year boundary and
/// the start moves back one year.
pub fn month_day_range(
    start: &str,
    end: &str,
    year: i32,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let end_date = parse_month_day(end, year);
    let mut start_date = parse_month_day(start, year);

    if let (Some(s), Some(e)) = (start_date, end_date) {
        if s > e {
            start_date = parse_month_day(start, year - 1);
        }
    }

    (start_date, end_date)
}

/// Format as printed on bills: "Apr 6, 2025".
pub fn format_month_day_year(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Month number from an English month name or its three-letter prefix.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim().trim_end_matches('.').to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }

    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august",
        "september", "october", "november", "december",
    ];

    MONTHS
        .iter()
        .position(|full| {
            *full == name
                || full[..3] == name
                || (name == "sept" && *full == "september")
        })
        .map(|i| i as u32 + 1)
}

/// Two-digit years: 00-50 are 20xx, 51-99 are 19xx.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    Some(if year < 100 {
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    })
}
