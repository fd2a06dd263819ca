//! End-to-end tests for the extraction pipeline.

use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use utilx_core::{
    detect_provider, extract_bills, BillParser, ExtractionError, Provider, UsageType, UtilxError,
};

const BC_HYDRO: &str = "\
BC Hydro
Statement date Feb 3, 2025 Page 1 of 2
bchydro.com
Total due for consolidated account $1,200.00
ACME PROPERTY
MANAGEMENT LTD
Member account # 123 456
Service address: 100 Main St Vancouver
Meter reading information
1,234 kWh used over 31 days
Starting Jan 1, 2025
Ending Jan 31, 2025
CURRENT CHARGES $156.02";

const ENMAX: &str = "\
ENMAX Energy enmax.com
PR SALY CENTRE LTD. Account Number: 501722953
Current Bill Date: 2025 April 12
1200 9 AVE SE
CALGARY AB T2G 0S9
You are on: Easymax
ELECTRICITY Provided by ENMAX Energy
Energy Charge (Mar6toApr3)
2,680.000 kWh @ $0.12
Summary of charges $ 410.95
WATER TREATMENT AND SUPPLY
Water Charge (Mar6toApr3)
115.000 m3 @ $2.10
Summary $ 1,323.93
Thank you for choosing ENMAX";

const FORTIS_BC: &str = "\
FortisBC Inc. fortisbc.com
Account number: 5257631506-4
Name: JANE SMITH Service address: 1975 Springfield Rd Kelowna Due date: Jun 23, 2025
Billing date: Jun 02, 2025
Billing period: May 02-Jun 02, 2025
Amount due: $1,045.02
You used 8,120 kWh at an average cost of $0.12";

const DIRECT_ENERGY: &str = "\
Direct Energy Business directenergy.com
Invoice Date: 05-Apr-25
NORTHSIDE HOLDINGS INC Product: Fixed Price Gas
Utility Account: 0045-771-220
Billing Period: March 2025
Total Usage (GJs): 48.25
Subtotal: $ 1,287.40";

const CREATIVE_ENERGY: &str = "\
Creative Energy creativeenergycanada.com
BILLING DATE: 5/31/2021
ACCT # 059
Building Date From Date To Reading Prior Reading Current Mult Consumption
1055 WEST GEORGIA 4/30/2021 5/31/2021 12,010.00 13,250.50 1 1,240.50
Total Due $ 9,876.54";

const VANCOUVER: &str = "\
City of Vancouver vancouver.ca/utilitybilling
ACCT NUMBER: 310045
BILLING DATE: Apr 6, 2025
NAME: STRATA PLAN LMS 1234 ***
FOR SERVICE AT: 455 W 10TH AVE
BILLING PERIOD: Jan 1, 2025
TO: Mar 31, 2025
METER NO. CONSUMPTION AMOUNT
12345 188 UNITS 1,045.20
IF PAID ON OR BEFORE DUE DATE: $1,045.20";

const WILLIAMS_LAKE: &str = "\
City of Williams Lake www.williamslake.ca
BILLING DATE ACCOUNT NUMBER
UTILITY BILL
Apr 30/25 40012
OWNER: LAKESIDE FOODS LTD Amount Due
SERVICE ADDRESS: 250 OLIVER ST Payments received
SERVICE PERIOD
Jan 01/25 Mar 31/25
Meter 5521 188 CM
Meter 5522 30 CM
TOTAL CURRENT 141.80";

const KELOWNA: &str = "\
City of Kelowna kelowna.ca
ACCT NUMBER: 1001 BILLING DATE: Apr 6, 2025
NAME: OKANAGAN MOTEL LTD *
FOR SERVICE AT: 1560 WATER ST
BILLING PERIOD: Jan 1, 2025
TO: Mar 31, 2025
Meter 81234 Apr 01/25 188 CM
Meter 81236 Apr 01/25 30 CM
Apr 6, 2025 Water 161.33
Apr 6, 2025 Sewer 1,040.10";

fn all_documents() -> Vec<(Provider, &'static str)> {
    vec![
        (Provider::FortisBcElectric, FORTIS_BC),
        (Provider::BcHydro, BC_HYDRO),
        (Provider::Enmax, ENMAX),
        (Provider::DirectEnergy, DIRECT_ENERGY),
        (Provider::CreativeEnergy, CREATIVE_ENERGY),
        (Provider::CityOfVancouver, VANCOUVER),
        (Provider::CityOfWilliamsLake, WILLIAMS_LAKE),
        (Provider::CityOfKelowna, KELOWNA),
    ]
}

fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).ok()
}

#[test]
fn test_bc_hydro_consolidated_bill() {
    let result = BillParser::new().parse(BC_HYDRO).unwrap();

    assert_eq!(result.provider, Provider::BcHydro);
    assert_eq!(result.records.len(), 1);

    let record = &result.records[0];
    assert_eq!(record.account_number.as_deref(), Some("123456"));
    assert_eq!(record.name.as_deref(), Some("ACME PROPERTY MANAGEMENT LTD"));
    assert_eq!(record.billing_date, ymd(2025, 2, 3));
    assert_eq!(record.period_start, ymd(2025, 1, 1));
    assert_eq!(record.period_end, ymd(2025, 1, 31));
    assert_eq!(record.consumption, Some(1234.0));
    assert_eq!(record.charges, amount("156.02"));
    assert!(record.is_metered);
}

/// One member-account block as printed on a consolidated statement.
/// Odd accounts are metered, even ones are flat-rate.
fn member_account(i: u32) -> String {
    let usage = if i % 2 == 1 {
        format!(
            "Meter reading information\n\
             1,00{i} kWh used over 31 days\n\
             Starting Jan {i}, 2025\n\
             Ending Feb {i}, 2025\n"
        )
    } else {
        format!(
            "Based on Overhead Street Lighting Rate 1701\n\
             Jan {i}, 2025 to Feb {i}, 2025\n\
             Energy charges 1,00{i} kWh at $0.10\n"
        )
    };

    format!(
        "HOLDER {i}\n\
         Member account # 100{i}\n\
         Service address: {i} Main St\n\
         {usage}\
         CURRENT CHARGES $10.0{i}\n"
    )
}

#[test]
fn test_bc_hydro_member_accounts_one_record_each() {
    let mut text = String::from(
        "BC Hydro\n\
         Statement date Feb 3, 2025 Page 1 of 3\n\
         bchydro.com\n\
         Total due for consolidated account $50.10\n",
    );
    for i in 1..=4 {
        text.push_str(&member_account(i));
    }
    text.push_str("Page 3 of 3\nThank you");

    let result = BillParser::new().parse(&text).unwrap();

    assert_eq!(result.sections, 4);
    assert_eq!(result.skipped_sections, 0);
    assert_eq!(result.records.len(), 4);

    for (record, i) in result.records.iter().zip(1u32..) {
        assert_eq!(record.account_number, Some(format!("100{i}")));
        assert_eq!(record.name, Some(format!("HOLDER {i}")));
        assert_eq!(record.service_address, Some(format!("{i} Main St")));
        assert_eq!(record.billing_date, ymd(2025, 2, 3));
        assert_eq!(record.period_start, ymd(2025, 1, i));
        assert_eq!(record.period_end, ymd(2025, 2, i));
        assert_eq!(record.consumption, Some(1000.0 + f64::from(i)));
        assert_eq!(record.charges, amount(&format!("10.0{i}")));
        assert_eq!(record.is_metered, i % 2 == 1);
        assert_eq!(record.usage_type(), UsageType::Electricity);
    }
}

#[test]
fn test_enmax_sections_share_account() {
    let result = BillParser::new().parse(ENMAX).unwrap();

    assert_eq!(result.provider, Provider::Enmax);
    assert_eq!(result.records.len(), 2);

    let (electricity, water) = (&result.records[0], &result.records[1]);
    assert_eq!(electricity.usage_type(), UsageType::Electricity);
    assert_eq!(electricity.consumption, Some(2680.0));
    assert_eq!(electricity.charges, amount("410.95"));
    assert_eq!(water.usage_type(), UsageType::Water);
    assert_eq!(water.consumption, Some(115.0));
    assert_eq!(water.charges, amount("1323.93"));

    for record in &result.records {
        assert_eq!(record.account_number.as_deref(), Some("501722953"));
        assert_eq!(record.billing_date, ymd(2025, 4, 12));
        assert_eq!(record.period_start, ymd(2025, 3, 6));
        assert_eq!(record.period_end, ymd(2025, 4, 3));
    }
}

#[test]
fn test_every_provider_detected_and_extracted() {
    for (provider, text) in all_documents() {
        assert_eq!(detect_provider(text), Ok(provider), "{}", provider.id());

        let result = BillParser::new().parse(text).unwrap();
        assert_eq!(result.provider, provider);
        assert!(!result.records.is_empty(), "{}", provider.id());
        for record in &result.records {
            assert!(record.is_complete(), "{}: {:?}", provider.id(), record.missing_fields());
        }
    }
}

#[test]
fn test_usage_unit_matches_usage_type() {
    for (provider, text) in all_documents() {
        for record in BillParser::new().parse(text).unwrap().records {
            assert_eq!(record.usage_unit(), record.usage_type().unit(), "{}", provider.id());
        }
    }
}

#[test]
fn test_crlf_matches_lf() {
    for (provider, text) in all_documents() {
        let crlf = text.replace('\n', "\r\n");
        let lf = BillParser::new().parse(text).unwrap();
        let windows = BillParser::new().parse(&crlf).unwrap();

        assert_eq!(windows.records, lf.records, "{}", provider.id());
        assert_eq!(windows.warnings, lf.warnings);
    }
}

#[test]
fn test_parsing_is_repeatable() {
    let parser = BillParser::new();
    for (_, text) in all_documents() {
        assert_eq!(
            parser.parse(text).unwrap().records,
            parser.parse(text).unwrap().records
        );
    }
}

#[test]
fn test_adversarial_input_returns_promptly() {
    let mut text = String::from("bchydro.com\n");
    text.push_str(&"Member account # 1 Starting Jan ".repeat(20_000));
    text.push_str(&"CURRENT CHARGES $".repeat(20_000));

    let start = Instant::now();
    let result = BillParser::new().parse(&text);
    assert!(start.elapsed() < Duration::from_secs(30));
    assert!(result.is_ok());
}

#[test]
fn test_document_level_errors() {
    assert!(matches!(
        BillParser::new().parse(""),
        Err(UtilxError::Extraction(ExtractionError::InvalidInput(_)))
    ));
    assert!(matches!(
        BillParser::new().parse("Dear customer, your statement is attached."),
        Err(UtilxError::Extraction(ExtractionError::ProviderNotDetected))
    ));
}

#[test]
fn test_extract_bills() {
    let records = extract_bills(VANCOUVER).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].account_number.as_deref(), Some("310045"));
    assert_eq!(records[0].consumption, Some(188.0));

    assert!(extract_bills("   ").is_err());
}
