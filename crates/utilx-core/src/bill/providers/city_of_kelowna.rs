//! City of Kelowna utility bills: several meters and charge rows per bill.

use lazy_static::lazy_static;

use super::city_of_vancouver::{civic_header, ACCOUNT_ANCHOR};
use super::{capture_on_line, BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{
    format_month_day_year, non_blank, sum_amounts_on_lines_starting_with, sum_cubic_metre_lines,
};
use crate::models::bill::{BillRecord, Provider};

lazy_static! {
    static ref ACCOUNT: TimedRegex = TimedRegex::new(
        r"(?i)ACCT\s*NUMBER:\s*([0-9]+)\s+BILLING"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CityOfKelownaExtractor;

impl BillExtractor for CityOfKelownaExtractor {
    fn provider(&self) -> Provider {
        Provider::CityOfKelowna
    }

    fn extract(&self, section: &str, _context: &DocumentContext) -> Option<BillRecord> {
        let account = capture_on_line(section, ACCOUNT_ANCHOR, &ACCOUNT)?;

        let mut record = civic_header(
            section,
            BillRecord::new(self.provider().expected_usage_type()),
        );
        record.account_number = non_blank(account);
        record.consumption = sum_cubic_metre_lines(section);

        // Only rows dated on the billing date are current charges; earlier
        // rows are carried-over balances and penalties.
        record.charges = record.billing_date.map(|billed| {
            sum_amounts_on_lines_starting_with(section, &format_month_day_year(billed))
        });

        Some(record)
    }
}
