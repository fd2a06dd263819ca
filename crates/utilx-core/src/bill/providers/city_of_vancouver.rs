//! City of Vancouver metered water bills.
//!
//! Kelowna prints the same header block, so the header readers here are
//! shared with that provider.

use lazy_static::lazy_static;

use super::{capture_on_line, date_on_line, BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{line_after, non_blank, parse_amount, parse_quantity};
use crate::models::bill::{BillRecord, Provider};

lazy_static! {
    static ref ACCOUNT: TimedRegex = TimedRegex::new(r"(?i)ACCT\s*NUMBER:\s*([0-9]+)").unwrap();

    static ref BILLING_DATE: TimedRegex = TimedRegex::new(
        r"(?i)BILLING\s*DATE:\s*([A-Za-z]{3,9}\s+\d{1,2},\s*\d{4})"
    ).unwrap();

    static ref NAME: TimedRegex = TimedRegex::new(r"(?i)NAME:\s*(.*?)\s*\*").unwrap();

    static ref ADDRESS: TimedRegex = TimedRegex::new(r"(?i)FOR\s*SERVICE\s*AT:\s*(.+)").unwrap();

    static ref PERIOD_START: TimedRegex = TimedRegex::new(
        r"(?i)BILLING\s*PERIOD:\s*([A-Za-z]{3,9}\s+\d{1,2},\s*\d{4})"
    ).unwrap();

    static ref PERIOD_END: TimedRegex = TimedRegex::new(
        r"(?i)TO:\s*([A-Za-z]{3,9}\s+\d{1,2},\s*\d{4})"
    ).unwrap();

    static ref CONSUMPTION: TimedRegex = TimedRegex::new(r"(?i)(\d+)\s+UNITS").unwrap();

    static ref AMOUNT_DUE: TimedRegex = TimedRegex::new(
        r"(?i)IF\s*PAID\s*ON\s*OR\s*BEFORE\s*DUE\s*DATE:\s*(\$?[\d,]+\.\d{2})"
    ).unwrap();
}

pub(super) const ACCOUNT_ANCHOR: &str = "ACCT NUMBER:";

/// Name, service address, billing date and period from a civic water
/// bill header.
pub(super) fn civic_header(text: &str, record: BillRecord) -> BillRecord {
    let mut record = record.with_period((
        date_on_line(text, "BILLING PERIOD:", &PERIOD_START),
        date_on_line(text, "TO:", &PERIOD_END),
    ));
    record.name = capture_on_line(text, "NAME:", &NAME).and_then(non_blank);
    record.service_address = capture_on_line(text, "FOR SERVICE AT:", &ADDRESS).and_then(non_blank);
    record.billing_date = date_on_line(text, "BILLING DATE:", &BILLING_DATE);
    record
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CityOfVancouverExtractor;

impl BillExtractor for CityOfVancouverExtractor {
    fn provider(&self) -> Provider {
        Provider::CityOfVancouver
    }

    fn extract(&self, section: &str, _context: &DocumentContext) -> Option<BillRecord> {
        let account = capture_on_line(section, ACCOUNT_ANCHOR, &ACCOUNT)?;

        let mut record = civic_header(
            section,
            BillRecord::new(self.provider().expected_usage_type()),
        );
        record.account_number = non_blank(account);
        record.consumption = line_after(section, "CONSUMPTION AMOUNT")
            .and_then(|line| CONSUMPTION.capture_str(line))
            .and_then(parse_quantity);
        record.charges = capture_on_line(section, "IF PAID ON OR BEFORE DUE DATE:", &AMOUNT_DUE)
            .and_then(parse_amount);

        Some(record)
    }
}
