//! Static metadata: provider keywords, usage units and display metadata.
//!
//! To support a new provider, add a keyword set that appears reliably in its
//! invoices (domain name, footer text) and that no other provider's
//! invoices contain.

use crate::models::bill::{Provider, UsageType, UsageUnit};

/// Required detection keywords per provider, in detection order.
/// Keywords are matched case-insensitively and all must be present.
pub const PROVIDER_KEYWORDS: &[(Provider, &[&str])] = &[
    (Provider::FortisBcElectric, &["fortisbc.com"]),
    (Provider::BcHydro, &["bchydro.com"]),
    (Provider::Enmax, &["enmax.com"]),
    (Provider::DirectEnergy, &["directenergy.com"]),
    (Provider::CreativeEnergy, &["creativeenergycanada.com"]),
    (Provider::CityOfVancouver, &["vancouver.ca/utilitybilling"]),
    (Provider::CityOfWilliamsLake, &["www.williamslake.ca"]),
    (Provider::CityOfKelowna, &["kelowna.ca"]),
];

/// Display metadata for a usage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageDisplay {
    /// Human label.
    pub label: &'static str,
    /// Bootstrap icon class used by front ends.
    pub icon: &'static str,
}

/// Keywords that identify `provider`.
pub fn keywords(provider: Provider) -> &'static [&'static str] {
    PROVIDER_KEYWORDS
        .iter()
        .find(|(p, _)| *p == provider)
        .map(|(_, kws)| *kws)
        .unwrap_or(&[])
}

/// Unit consumption of `usage_type` is measured in.
pub fn usage_unit(usage_type: UsageType) -> UsageUnit {
    match usage_type {
        UsageType::Electricity => UsageUnit::KilowattHours,
        UsageType::Gas => UsageUnit::Gigajoules,
        UsageType::Water => UsageUnit::CubicMetres,
        UsageType::Steam => UsageUnit::Pounds,
    }
}

pub fn usage_display(usage_type: UsageType) -> UsageDisplay {
    match usage_type {
        UsageType::Electricity => UsageDisplay {
            label: "Electricity",
            icon: "bi bi-plug",
        },
        UsageType::Gas => UsageDisplay {
            label: "Gas",
            icon: "bi bi-fuel-pump",
        },
        UsageType::Water => UsageDisplay {
            label: "Water",
            icon: "bi bi-droplet",
        },
        UsageType::Steam => UsageDisplay {
            label: "Steam",
            icon: "bi bi-wind",
        },
    }
}
