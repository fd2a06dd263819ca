//! City of Williams Lake water bills.

use lazy_static::lazy_static;

use super::{capture_on_line, BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{
    line_after, non_blank, parse_amount, parse_month_day_short_year,
    parse_quantity, sum_cubic_metre_lines,
};
use crate::models::bill::{BillRecord, Provider};

lazy_static! {
    static ref NAME: TimedRegex = TimedRegex::new(r"(?is)OWNER:\s*(.*?)\s+Amoun").unwrap();

    static ref ADDRESS: TimedRegex = TimedRegex::new(
        r"(?i)SERVICE ADDRESS:\s*(.*?)\s+Payments"
    ).unwrap();

    static ref SERVICE_PERIOD: TimedRegex = TimedRegex::new(
        r"(?i)([A-Za-z]{3}\s+\d{2}/\d{2})\s+([A-Za-z]{3}\s+\d{2}/\d{2})"
    ).unwrap();

    // "Apr 30/25 40012"
    static ref BILLING_INFO: TimedRegex = TimedRegex::new(
        r"(?i)^([A-Za-z]{3}\s+\d{2}/\d{2})\s+(\d+)$"
    ).unwrap();

    static ref CURRENT_TOTAL: TimedRegex = TimedRegex::new(r"([0-9,]+\.[0-9]{2})").unwrap();

    static ref UNITS: TimedRegex = TimedRegex::new(r"(?i)(\d+)\s+units").unwrap();
}

const BILLING_INFO_ANCHOR: &str = "BILLING DATE ACCOUNT NUMBER";

#[derive(Debug, Clone, Copy, Default)]
pub struct CityOfWilliamsLakeExtractor;

impl CityOfWilliamsLakeExtractor {
    /// The billing date and account number sit two lines under their
    /// column headings. The intermediate line is located by its own text,
    /// so a blank one means the values cannot be found.
    fn billing_info(text: &str) -> Option<(&str, &str)> {
        let first = line_after(text, BILLING_INFO_ANCHOR)?;
        if first.is_empty() {
            return None;
        }
        let line = line_after(text, first)?;
        let caps = BILLING_INFO.captures(line)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }

    fn service_period(text: &str) -> (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>) {
        let Some(caps) = line_after(text, "SERVICE PERIOD").and_then(|l| SERVICE_PERIOD.captures(l))
        else {
            return (None, None);
        };
        match (
            parse_month_day_short_year(&caps[1]),
            parse_month_day_short_year(&caps[2]),
        ) {
            (Some(start), Some(end)) => (Some(start), Some(end)),
            _ => (None, None),
        }
    }

    /// Per-meter lines ending in "CM" when present, else the "N units"
    /// summary line.
    fn consumption(text: &str) -> Option<f64> {
        sum_cubic_metre_lines(text).or_else(|| {
            capture_on_line(text, "units", &UNITS).and_then(parse_quantity)
        })
    }
}

impl BillExtractor for CityOfWilliamsLakeExtractor {
    fn provider(&self) -> Provider {
        Provider::CityOfWilliamsLake
    }

    fn extract(&self, section: &str, _context: &DocumentContext) -> Option<BillRecord> {
        let (billed_on, account) = Self::billing_info(section)?;

        let mut record = BillRecord::new(self.provider().expected_usage_type())
            .with_period(Self::service_period(section));
        record.account_number = non_blank(account);
        record.billing_date = parse_month_day_short_year(billed_on);
        record.name = capture_on_line(section, "OWNER:", &NAME).and_then(non_blank);
        record.service_address =
            capture_on_line(section, "SERVICE ADDRESS:", &ADDRESS).and_then(non_blank);
        record.consumption = Self::consumption(section);
        record.charges =
            capture_on_line(section, "TOTAL CURRENT", &CURRENT_TOTAL).and_then(parse_amount);

        Some(record)
    }
}
