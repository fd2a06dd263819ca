//! Enmax multi-commodity bills: one section per commodity block.

use chrono::Datelike;
use lazy_static::lazy_static;

use super::{BillExtractor, DocumentContext};
use crate::bill::rules::patterns::TimedRegex;
use crate::bill::rules::{month_day_range, non_blank, parse_amount, parse_quantity, parse_year_month_day};
use crate::models::bill::{BillRecord, Provider, UsageType};

lazy_static! {
    static ref ACCOUNT: TimedRegex = TimedRegex::new(r"(?i)Account Number:\s*(\d+)").unwrap();

    static ref NAME: TimedRegex = TimedRegex::new(r"(?m)^(.+?)\s*Account Number:").unwrap();

    static ref BILLING_DATE: TimedRegex = TimedRegex::new(
        r"(?i)Current Bill Date:\s*([0-9]{4}\s+[A-Za-z]+\s+\d{1,2})"
    ).unwrap();

    static ref ADDRESS: TimedRegex = TimedRegex::new(
        r"(?is)Current Bill Date:[^\n]*\n(.*?)\nYou are on:"
    ).unwrap();

    static ref ELECTRICITY_USAGE: TimedRegex = TimedRegex::new(r"([\d,]+\.\d+)\s*kWh\s*@").unwrap();

    static ref WATER_USAGE: TimedRegex = TimedRegex::new(r"([\d,]+\.\d+)\s*m3\s*@").unwrap();

    static ref SECTION_TOTAL: TimedRegex = TimedRegex::new(
        r"(?m)^Summary[^$]*(\$\s*[\d,]+\.\d{2})"
    ).unwrap();

    // "(Mar6toApr3)"
    static ref DURATION: TimedRegex = TimedRegex::new(
        r"\(\s*([A-Za-z]{3})(\d{1,2})to([A-Za-z]{3})(\d{1,2})\s*\)"
    ).unwrap();
}

const ELECTRICITY_HEADER: &str = "ELECTRICITY";
const WATER_HEADER: &str = "WATER TREATMENT AND SUPPLY";

#[derive(Debug, Clone, Copy, Default)]
pub struct EnmaxExtractor;

impl EnmaxExtractor {
    fn section_kind(section: &str) -> Option<(UsageType, &'static TimedRegex)> {
        if section.starts_with(ELECTRICITY_HEADER) {
            Some((UsageType::Electricity, &*ELECTRICITY_USAGE))
        } else if section.starts_with(WATER_HEADER) {
            Some((UsageType::Water, &*WATER_USAGE))
        } else {
            None
        }
    }
}

impl BillExtractor for EnmaxExtractor {
    fn provider(&self) -> Provider {
        Provider::Enmax
    }

    fn document_context(&self, text: &str) -> DocumentContext {
        DocumentContext {
            billing_date: BILLING_DATE.capture_str(text).and_then(parse_year_month_day),
            account_number: ACCOUNT.capture_str(text).and_then(non_blank),
            name: NAME.capture_str(text).and_then(non_blank),
            service_address: ADDRESS.capture_str(text).and_then(non_blank),
        }
    }

    fn extract(&self, section: &str, context: &DocumentContext) -> Option<BillRecord> {
        let (usage_type, usage_pattern) = Self::section_kind(section.trim_start())?;
        let account = context.account_number.clone()?;

        let mut record = BillRecord::new(usage_type);
        record.account_number = Some(account);
        record.name = context.name.clone();
        record.service_address = context.service_address.clone();
        record.billing_date = context.billing_date;
        record.consumption = usage_pattern.capture_str(section).and_then(parse_quantity);
        record.charges = SECTION_TOTAL.capture_str(section).and_then(parse_amount);

        // The range is printed without a year; it belongs to the bill's year.
        if let (Some(caps), Some(billed)) = (DURATION.captures(section), context.billing_date) {
            let start = format!("{} {}", &caps[1], &caps[2]);
            let end = format!("{} {}", &caps[3], &caps[4]);
            let period = month_day_range(&start, &end, billed.year());
            record.period_start = period.0;
            record.period_end = period.1;
        }

        Some(record)
    }
}
