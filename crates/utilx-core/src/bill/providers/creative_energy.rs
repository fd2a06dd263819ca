//! Creative Energy district steam bills.

use lazy_static::lazy_static;

use super::{capture_on_line, BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{non_blank, parse_amount, parse_numeric_mdy, parse_quantity};
use crate::models::bill::{BillRecord, Provider};

lazy_static! {
    static ref BILLING_DATE: TimedRegex = TimedRegex::new(
        r"(?i)BILLING\s+DATE:\s*(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    static ref ACCOUNT: TimedRegex = TimedRegex::new(r"(?i)ACCT\s*#\s*([0-9]+)").unwrap();

    static ref READINGS_HEADER: TimedRegex = TimedRegex::new(
        r"(?mi)^\s*Building\s+Date\s+From\s+Date\s+To\s+Reading\s+Prior\s+Reading\s+Current\s+Mult\s+Consumption"
    ).unwrap();

    // building, from, to, prior reading, current reading, multiplier, consumption
    static ref READINGS_ROW: TimedRegex = TimedRegex::new(
        r"(?m)^[ \t]*(\S.*?)\s+(\d{1,2}/\d{1,2}/\d{4})\s+(\d{1,2}/\d{1,2}/\d{4})\s+[\d,]+\.\d{2}\s+[\d,]+\.\d{2}\s+\d+\s+([\d,]+\.\d{2})"
    ).unwrap();

    static ref TOTAL_DUE: TimedRegex = TimedRegex::new(
        r"(?i)Total\s+Due\s*(\$\s*[\d,]+\.\d{2})"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreativeEnergyExtractor;

impl CreativeEnergyExtractor {
    /// Fill building, period and consumption from the first meter row
    /// printed under the readings header.
    fn apply_readings(section: &str, record: &mut BillRecord) {
        let Some(header) = READINGS_HEADER.find(section) else {
            return;
        };
        let Some(row) = READINGS_ROW.captures(&section[header.end()..]) else {
            return;
        };

        let building = non_blank(&row[1]);
        record.service_address = building.clone();
        record.name = building;
        record.period_start = parse_numeric_mdy(&row[2]);
        record.period_end = parse_numeric_mdy(&row[3]);
        record.consumption = parse_quantity(&row[4]);
    }
}

impl BillExtractor for CreativeEnergyExtractor {
    fn provider(&self) -> Provider {
        Provider::CreativeEnergy
    }

    fn extract(&self, section: &str, _context: &DocumentContext) -> Option<BillRecord> {
        let account = capture_on_line(section, "ACCT #", &ACCOUNT)?;

        let mut record = BillRecord::new(self.provider().expected_usage_type());
        record.account_number = non_blank(account);
        record.billing_date =
            capture_on_line(section, "BILLING DATE:", &BILLING_DATE).and_then(parse_numeric_mdy);
        record.charges = capture_on_line(section, "Total Due $", &TOTAL_DUE).and_then(parse_amount);
        Self::apply_readings(section, &mut record);

        Some(record)
    }
}
