//! Direct Energy natural gas invoices.

use lazy_static::lazy_static;

use super::{capture_on_line, BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{
    non_blank, parse_amount, parse_day_month_short_year, parse_month_year_range, parse_quantity,
    text_before,
};
use crate::models::bill::{BillRecord, Provider};

lazy_static! {
    static ref INVOICE_DATE: TimedRegex = TimedRegex::new(
        r"(?im)^\s*Invoice Date:\s*(\d{1,2}-[A-Za-z]{3}-\d{2})"
    ).unwrap();

    static ref BILLING_PERIOD: TimedRegex = TimedRegex::new(
        r"(?i)Billing Period:\s*([A-Za-z]+\s+\d{4})"
    ).unwrap();

    static ref SUBTOTAL: TimedRegex = TimedRegex::new(
        r"(?i)Subtotal:\s*(\$\s*[\d,]+\.\d{2})"
    ).unwrap();

    static ref TOTAL_USAGE: TimedRegex = TimedRegex::new(
        r"(?i)Total Usage \(GJs\):\s*(\d+\.\d{2})"
    ).unwrap();

    static ref ACCOUNT: TimedRegex = TimedRegex::new(r"(?i)Utility Account:\s*(.*)$").unwrap();
}

const ACCOUNT_ANCHOR: &str = "Utility Account:";

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectEnergyExtractor;

impl BillExtractor for DirectEnergyExtractor {
    fn provider(&self) -> Provider {
        Provider::DirectEnergy
    }

    fn extract(&self, section: &str, _context: &DocumentContext) -> Option<BillRecord> {
        let account = capture_on_line(section, ACCOUNT_ANCHOR, &ACCOUNT)?;

        // Invoices bill whole calendar months.
        let period = capture_on_line(section, "Billing Period:", &BILLING_PERIOD)
            .and_then(parse_month_year_range)
            .map_or((None, None), |(first, last)| (Some(first), Some(last)));

        let mut record =
            BillRecord::new(self.provider().expected_usage_type()).with_period(period);
        record.account_number = non_blank(account);
        record.name = text_before(section, "Product:").and_then(non_blank);
        record.billing_date = INVOICE_DATE
            .capture_str(section)
            .and_then(parse_day_month_short_year);
        record.charges = capture_on_line(section, "Subtotal:", &SUBTOTAL).and_then(parse_amount);
        record.consumption =
            capture_on_line(section, "Total Usage (GJs):", &TOTAL_USAGE).and_then(parse_quantity);

        Some(record)
    }
}
