//! FortisBC electricity bills.

use lazy_static::lazy_static;

use super::{BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{month_day_range, non_blank, parse_amount, parse_month_day_year, parse_quantity};
use crate::models::bill::{BillRecord, Provider};

lazy_static! {
    static ref ACCOUNT: TimedRegex = TimedRegex::new(
        r"(?i)Account number[:\s]+([0-9\-]+)"
    ).unwrap();

    static ref NAME: TimedRegex = TimedRegex::new(
        r"(?i)Name:[ \t]*([^\n]*?)\s+Service address:"
    ).unwrap();

    static ref ADDRESS: TimedRegex = TimedRegex::new(
        r"(?i)Service address:[ \t]*([^\n]*?)Due"
    ).unwrap();

    static ref BILLING_DATE: TimedRegex = TimedRegex::new(
        r"(?i)Billing date[:\s]+([A-Za-z]{3,9} \d{1,2}, \d{4})"
    ).unwrap();

    // "Billing period: May 02-Jun 02, 2025"
    static ref BILLING_PERIOD: TimedRegex = TimedRegex::new(
        r"(?i)Billing period[:\s]+([A-Za-z]{3,9} \d{1,2})\s*[-–]\s*([A-Za-z]{3,9} \d{1,2}),\s*(\d{4})"
    ).unwrap();

    static ref AMOUNT_DUE: TimedRegex = TimedRegex::new(
        r"(?i)Amount due[:\s]*(\$[0-9,]+\.?[0-9]{0,2})"
    ).unwrap();

    static ref USAGE_AT: TimedRegex = TimedRegex::new(
        r"(?i)You used\s*([0-9,]+)\s*kWh\s*at"
    ).unwrap();

    static ref USAGE: TimedRegex = TimedRegex::new(
        r"(?i)You used\s*([0-9,]+)\s*kWh"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FortisBcExtractor;

impl FortisBcExtractor {
    fn billing_period(text: &str) -> (Option<chrono::NaiveDate>, Option<chrono::NaiveDate>) {
        let Some(caps) = BILLING_PERIOD.captures(text) else {
            return (None, None);
        };
        let Ok(year) = caps[3].parse::<i32>() else {
            return (None, None);
        };
        month_day_range(&caps[1], &caps[2], year)
    }

    /// The "kWh at" form is the metered total; the bare form also matches
    /// marketing text, so it is only a fallback.
    fn usage(text: &str) -> Option<f64> {
        USAGE_AT
            .capture_str(text)
            .or_else(|| USAGE.capture_str(text))
            .and_then(parse_quantity)
    }
}

impl BillExtractor for FortisBcExtractor {
    fn provider(&self) -> Provider {
        Provider::FortisBcElectric
    }

    fn extract(&self, section: &str, _context: &DocumentContext) -> Option<BillRecord> {
        let account = ACCOUNT.capture_str(section)?;

        let mut record = BillRecord::new(self.provider().expected_usage_type())
            .with_period(Self::billing_period(section));
        record.account_number = non_blank(account);
        record.name = NAME.capture_str(section).and_then(non_blank);
        record.service_address = ADDRESS.capture_str(section).and_then(non_blank);
        record.billing_date = BILLING_DATE
            .capture_str(section)
            .and_then(parse_month_day_year);
        record.charges = AMOUNT_DUE.capture_str(section).and_then(parse_amount);
        record.consumption = Self::usage(section);

        Some(record)
    }
}
