//! Per-provider rule sets.
//!
//! Each provider pairs a [`Segmenter`] with a [`BillExtractor`]. The pairs
//! live in process-wide statics, built on first use and never mutated.

mod bc_hydro;
mod city_of_kelowna;
mod city_of_vancouver;
mod city_of_williams_lake;
mod creative_energy;
mod direct_energy;
mod enmax;
mod fortis_bc;

pub use bc_hydro::BcHydroExtractor;
pub use city_of_kelowna::CityOfKelownaExtractor;
pub use city_of_vancouver::CityOfVancouverExtractor;
pub use city_of_williams_lake::CityOfWilliamsLakeExtractor;
pub use creative_energy::CreativeEnergyExtractor;
pub use direct_energy::DirectEnergyExtractor;
pub use enmax::EnmaxExtractor;
pub use fortis_bc::FortisBcExtractor;

use chrono::NaiveDate;
use lazy_static::lazy_static;

use super::rules::patterns::TimedRegex;
use super::rules::{line_containing, parse_month_day_year};
use super::segmenter::{DelimitedSections, Segmenter, TerminatedSections, WholeDocument};
use crate::models::bill::{BillRecord, Provider};

/// Facts printed once per document and shared by all of its sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentContext {
    pub billing_date: Option<NaiveDate>,
    pub account_number: Option<String>,
    pub name: Option<String>,
    pub service_address: Option<String>,
}

/// Turns one section of a provider's bill into a record.
pub trait BillExtractor: Send + Sync {
    fn provider(&self) -> Provider;

    /// Facts read from the whole document before any section is extracted.
    fn document_context(&self, _text: &str) -> DocumentContext {
        DocumentContext::default()
    }

    /// Extract one section. Returns `None` only when the section is not a
    /// recognizable bill (mandatory anchor missing or unknown section kind);
    /// otherwise a best-effort record with unparseable fields left empty.
    fn extract(&self, section: &str, context: &DocumentContext) -> Option<BillRecord>;
}

/// Segmentation and extraction rules for one provider.
pub struct ProviderRules {
    pub segmenter: Box<dyn Segmenter>,
    pub extractor: Box<dyn BillExtractor>,
}

impl ProviderRules {
    fn new(segmenter: impl Segmenter + 'static, extractor: impl BillExtractor + 'static) -> Self {
        Self {
            segmenter: Box::new(segmenter),
            extractor: Box::new(extractor),
        }
    }
}

lazy_static! {
    static ref FORTIS_BC: ProviderRules = ProviderRules::new(WholeDocument, FortisBcExtractor);

    static ref BC_HYDRO: ProviderRules = ProviderRules::new(
        TerminatedSections::new(
            TimedRegex::new(r"(?i)CURRENT\s+CHARGES\s*-?\$\d[\d,]*\.\d{2}").unwrap()
        ),
        BcHydroExtractor,
    );

    static ref ENMAX: ProviderRules = ProviderRules::new(
        DelimitedSections::new(
            TimedRegex::new(
                r"(?ms)^(?:ELECTRICITY\s*Provided by|WATER TREATMENT AND SUPPLY).*?^Summary[^\n]*\$\s*[\d,]+\.\d{2}"
            ).unwrap()
        ),
        EnmaxExtractor,
    );

    static ref DIRECT_ENERGY: ProviderRules =
        ProviderRules::new(WholeDocument, DirectEnergyExtractor);

    static ref CREATIVE_ENERGY: ProviderRules =
        ProviderRules::new(WholeDocument, CreativeEnergyExtractor);

    static ref CITY_OF_VANCOUVER: ProviderRules =
        ProviderRules::new(WholeDocument, CityOfVancouverExtractor);

    static ref CITY_OF_WILLIAMS_LAKE: ProviderRules =
        ProviderRules::new(WholeDocument, CityOfWilliamsLakeExtractor);

    static ref CITY_OF_KELOWNA: ProviderRules =
        ProviderRules::new(WholeDocument, CityOfKelownaExtractor);
}

/// Rules registered for `provider`.
pub fn rules_for(provider: Provider) -> &'static ProviderRules {
    match provider {
        Provider::FortisBcElectric => &FORTIS_BC,
        Provider::BcHydro => &BC_HYDRO,
        Provider::Enmax => &ENMAX,
        Provider::DirectEnergy => &DIRECT_ENERGY,
        Provider::CreativeEnergy => &CREATIVE_ENERGY,
        Provider::CityOfVancouver => &CITY_OF_VANCOUVER,
        Provider::CityOfWilliamsLake => &CITY_OF_WILLIAMS_LAKE,
        Provider::CityOfKelowna => &CITY_OF_KELOWNA,
    }
}

pub fn segmenter_for(provider: Provider) -> &'static dyn Segmenter {
    rules_for(provider).segmenter.as_ref()
}

pub fn extractor_for(provider: Provider) -> &'static dyn BillExtractor {
    rules_for(provider).extractor.as_ref()
}

/// First capture of `pattern` on the line holding `anchor`.
pub(crate) fn capture_on_line<'a>(
    text: &'a str,
    anchor: &str,
    pattern: &TimedRegex,
) -> Option<&'a str> {
    line_containing(text, anchor).and_then(|line| pattern.capture_str(line))
}

/// A "Mon d, yyyy" date read by `pattern` from the line holding `anchor`.
pub(crate) fn date_on_line(text: &str, anchor: &str, pattern: &TimedRegex) -> Option<NaiveDate> {
    capture_on_line(text, anchor, pattern).and_then(parse_month_day_year)
}
