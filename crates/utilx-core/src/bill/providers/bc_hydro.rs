//! BC Hydro consolidated statements: one section per member account.

use lazy_static::lazy_static;

use super::{capture_on_line, BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{
    contains_anchor, cut_at, line_containing, non_blank, parse_amount, parse_month_day_year,
    parse_quantity, trimmed_lines,
};
use crate::models::bill::{BillRecord, Provider};

const RATE_KINDS: [&str; 8] = [
    "Small General Service Rate",
    "Medium General Service Rate",
    "Large General Service Rate",
    "Traffic Service Rate",
    "Ornamental Street Lighting Rate",
    "Overhead Street Lighting Rate",
    "Residential Tiered Rate",
    "Transformer Owner discount",
];

const SHORT_DATE: &str = r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2},\s*\d{4}";

lazy_static! {
    static ref BILLING_DATE: TimedRegex = TimedRegex::new(
        r"([A-Za-z]{3,9}\s+\d{1,2},\s*\d{4})"
    ).unwrap();

    static ref ACCOUNT: TimedRegex = TimedRegex::new(
        r"(?i)Member\s+account\s*#\s*([0-9 ]+)"
    ).unwrap();

    static ref ADDRESS: TimedRegex = TimedRegex::new(
        r"(?i)Service\s+address:\s*(.*)"
    ).unwrap();

    static ref ADDRESS_END: TimedRegex = TimedRegex::new(
        r"(?i)\d+%|UNMETERED\s+CHARGES|Meter\s+reading|Your\s+bill\s+has\s+been\s+corrected|No\s+change\s+in\s+e|Your\s+account\s+has\s+a\s+charge\s+o|ELECTRICITY\s+CHARGES"
    ).unwrap();

    static ref NAME_PERCENT_TAIL: TimedRegex = TimedRegex::new(r"\d+%.*$").unwrap();
    static ref NAME_PEAK_TAIL: TimedRegex = TimedRegex::new(r"(?i)\d+\s*kW\s*Peak.*$").unwrap();
    static ref NAME_NO_CHANGE_TAIL: TimedRegex = TimedRegex::new(r"(?i)No change.*$").unwrap();

    static ref METERED_USAGE: TimedRegex = TimedRegex::new(
        r"(?i)\b(\d[\d,]*)\s*kWh\s+used\s+over"
    ).unwrap();

    static ref UNMETERED_USAGE: TimedRegex = TimedRegex::new(
        r"(?i)Energy\s+charges?\s*(\d[\d,]*)\s*kWh"
    ).unwrap();

    static ref PERIOD_STARTING: TimedRegex = TimedRegex::new(
        r"(?i)Starting\s+([A-Za-z]{3}\s+\d{1,2},\s*\d{4})"
    ).unwrap();

    static ref PERIOD_ENDING: TimedRegex = TimedRegex::new(
        r"(?i)Ending\s+([A-Za-z]{3}\s+\d{1,2},\s*\d{4})"
    ).unwrap();

    static ref UNMETERED_PERIOD: TimedRegex = {
        let rates: Vec<String> = RATE_KINDS.iter().map(|r| regex::escape(r)).collect();
        TimedRegex::new(&format!(
            r"(?is)(?:Based\s+on\s+(?:{})\s*\d+|Continued).*?({SHORT_DATE})\s*to\s*({SHORT_DATE})",
            rates.join("|"),
        ))
        .unwrap()
    };

    static ref CURRENT_CHARGES: TimedRegex = TimedRegex::new(
        r"(?i)CURRENT\s+CHARGES\s*(-?\$\d[\d,]*\.\d{2})"
    ).unwrap();
}

const ACCOUNT_ANCHOR: &str = "Member account #";
const CONSOLIDATED_ANCHOR: &str = "Total due for consolidated account";
const DIRECTIVE_ANCHOR: &str = "Bill details for member accounts";
const METERED_ANCHOR: &str = "Meter reading information";

/// Extractor for BC Hydro member-account sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcHydroExtractor;

impl BcHydroExtractor {
    fn name(section: &str) -> Option<String> {
        let lines: Vec<&str> = trimmed_lines(section).collect();
        let member_idx = lines.iter().position(|l| contains_anchor(l, ACCOUNT_ANCHOR))?;
        if member_idx == 0 {
            return None;
        }

        let start_idx = lines
            .iter()
            .position(|l| contains_anchor(l, CONSOLIDATED_ANCHOR))
            .filter(|&i| i < member_idx)
            .map_or(0, |i| i + 1);

        let parts: Vec<String> = lines[start_idx..member_idx]
            .iter()
            .filter(|line| !contains_anchor(line, DIRECTIVE_ANCHOR))
            .map(|line| {
                let line = NAME_PERCENT_TAIL.replace_all(line, "");
                let line = NAME_PEAK_TAIL.replace_all(line.trim(), "");
                NAME_NO_CHANGE_TAIL.replace_all(line.trim(), "").trim().to_string()
            })
            .filter(|line| !line.is_empty())
            .collect();

        non_blank(&parts.join(" "))
    }

    fn service_address(section: &str) -> Option<String> {
        let rest = capture_on_line(section, "Service address:", &ADDRESS)?;
        non_blank(cut_at(rest, &ADDRESS_END))
    }

    fn metered_usage(section: &str) -> Option<f64> {
        capture_on_line(section, "kWh used", &METERED_USAGE).and_then(parse_quantity)
    }

    fn unmetered_usage(section: &str) -> Option<f64> {
        capture_on_line(section, "Energy charge", &UNMETERED_USAGE).and_then(parse_quantity)
    }

    fn metered_period(section: &str) -> (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>) {
        (
            capture_on_line(section, "Starting ", &PERIOD_STARTING).and_then(parse_month_day_year),
            capture_on_line(section, "Ending ", &PERIOD_ENDING).and_then(parse_month_day_year),
        )
    }

    /// The rate line and the date range are printed on separate lines.
    fn unmetered_period(section: &str) -> (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>) {
        let (Some(rate_line), Some(range_line)) = (
            line_containing(section, "Based on"),
            line_containing(section, " to "),
        ) else {
            return (None, None);
        };

        let combined = format!("{rate_line}\n{range_line}");
        match UNMETERED_PERIOD.captures(&combined) {
            Some(caps) => (
                parse_month_day_year(&caps[1]),
                parse_month_day_year(&caps[2]),
            ),
            None => (None, None),
        }
    }
}

impl BillExtractor for BcHydroExtractor {
    fn provider(&self) -> Provider {
        Provider::BcHydro
    }

    /// The statement date is printed on the second line of the document.
    fn document_context(&self, text: &str) -> DocumentContext {
        let billing_date = trimmed_lines(text)
            .nth(1)
            .and_then(|line| BILLING_DATE.capture_str(line))
            .and_then(parse_month_day_year);

        DocumentContext {
            billing_date,
            ..Default::default()
        }
    }

    fn extract(&self, section: &str, context: &DocumentContext) -> Option<BillRecord> {
        let account = capture_on_line(section, ACCOUNT_ANCHOR, &ACCOUNT)?;
        let account: String = account.chars().filter(|c| !c.is_whitespace()).collect();
        if account.is_empty() {
            return None;
        }

        let is_metered = contains_anchor(section, METERED_ANCHOR);
        let (consumption, period) = if is_metered {
            (Self::metered_usage(section), Self::metered_period(section))
        } else {
            (Self::unmetered_usage(section), Self::unmetered_period(section))
        };

        let mut record = BillRecord::new(self.provider().expected_usage_type()).with_period(period);
        record.account_number = Some(account);
        record.name = Self::name(section);
        record.service_address = Self::service_address(section);
        record.billing_date = context.billing_date;
        record.consumption = consumption;
        record.charges = capture_on_line(section, "CURRENT CHARGES", &CURRENT_CHARGES)
            .and_then(parse_amount);
        record.is_metered = is_metered;

        Some(record)
    }
}
