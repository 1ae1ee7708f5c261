use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::context::AmbitOrigin;

/// Tariff applied when no rule and no assignment matched anywhere.
pub const GENERAL_TARIFF_ID: u32 = 1;
pub const GENERAL_TARIFF_NAME: &str = "General Tariff";
pub const GENERAL_TARIFF_DISCOUNT_PCT: Decimal = dec!(5.0);

/// The precedence tier a tariff resolution came from.
///
/// Closed set on purpose: adding a tier forces every match site to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TariffLevel {
    ProductClient,
    FamilyClient,
    ProductGroup,
    FamilyGroup,
    ClientGeneral,
    FallbackGeneral,
}

/// Provenance of a resolved tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxOrigin {
    ProductType,
    AmbitGeneral,
    Unknown,
}

/// Outcome of tariff resolution: the discount to apply plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffMatch {
    pub discount_pct: Decimal,
    pub tariff_id: u32,
    pub tariff_name: String,
    pub level: TariffLevel,
    /// The rule that matched; None for assignments and the fallback.
    pub rule_id: Option<u32>,
}

impl TariffMatch {
    /// The hard-coded last resort: the 5% "General Tariff".
    pub fn fallback_general() -> Self {
        Self {
            discount_pct: GENERAL_TARIFF_DISCOUNT_PCT,
            tariff_id: GENERAL_TARIFF_ID,
            tariff_name: GENERAL_TARIFF_NAME.to_string(),
            level: TariffLevel::FallbackGeneral,
            rule_id: None,
        }
    }
}

/// Outcome of tax resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxMatch {
    pub rate_pct: Decimal,
    pub name: Option<String>,
    pub origin: TaxOrigin,
}

impl TaxMatch {
    /// No applicable rule (or the lookup failed): zero tax, unknown origin.
    pub fn unknown() -> Self {
        Self {
            rate_pct: Decimal::ZERO,
            name: None,
            origin: TaxOrigin::Unknown,
        }
    }
}

/// Full result of one price resolution, monetary fields rounded to 2
/// decimals. Field names serialize in the upstream camelCase convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub gross_unit: Decimal,
    pub discount_pct: Decimal,
    pub net_unit_ex_tax: Decimal,
    pub subtotal_ex_tax: Decimal,
    pub tax_pct: Decimal,
    pub tax_amount: Decimal,
    pub total_inc_tax: Decimal,
    pub tariff_id: Option<u32>,
    pub tariff_name: Option<String>,
    pub tariff_level: TariffLevel,
    pub rule_id: Option<u32>,
    pub tax_name: Option<String>,
    pub tax_origin: TaxOrigin,
    pub ambit: String,
    pub ambit_origin: Option<AmbitOrigin>,
}
