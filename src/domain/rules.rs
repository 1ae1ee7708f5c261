use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Precedence weight applied to rules that do not set one; lower wins ties.
pub const DEFAULT_RULE_PRIORITY: i32 = 999;

/// Inclusive temporal-window check, open-ended where a bound is absent.
pub fn window_active(
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
    as_of: NaiveDate,
) -> bool {
    valid_from.is_none_or(|from| from <= as_of) && valid_to.is_none_or(|to| to >= as_of)
}

/// A scoped, time-windowed binding of a tariff to a client, group, product
/// and/or family. Read-only to the engine; lifecycle is external CRUD.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffRule {
    pub id: u32,
    pub client_id: Option<u32>,
    pub group_id: Option<u32>,
    /// Normalized product reference. Legacy alias columns are folded into
    /// this single id at the snapshot boundary, never in the resolver.
    pub product_id: Option<u32>,
    pub family_id: Option<u32>,
    pub tariff_id: u32,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub priority: i32,
    pub enabled: bool,
}

impl TariffRule {
    pub fn active_on(&self, as_of: NaiveDate) -> bool {
        window_active(self.valid_from, self.valid_to, as_of)
    }
}

/// A named discount percentage referenced by rules and assignments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tariff {
    pub id: u32,
    pub name: String,
    pub discount_pct: Decimal,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Client-level fallback assignment, consulted only after every rule level
/// came up empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientTariffAssignment {
    pub client_id: u32,
    pub tariff_id: u32,
    pub valid_from: NaiveDate,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

impl ClientTariffAssignment {
    pub fn active_on(&self, as_of: NaiveDate) -> bool {
        window_active(Some(self.valid_from), self.valid_to, as_of)
    }
}

/// A scoped, time-windowed tax percentage, optionally restricted to a
/// product type and/or ambit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxRule {
    pub id: u32,
    pub name: String,
    pub rate_pct: Decimal,
    /// None applies to any ambit.
    #[serde(default)]
    pub ambit: Option<String>,
    /// None is a jurisdiction-general rule.
    #[serde(default)]
    pub product_type_id: Option<u32>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

impl TaxRule {
    pub fn active_on(&self, as_of: NaiveDate) -> bool {
        window_active(self.valid_from, self.valid_to, as_of)
    }

    /// Ambit scoping: a rule without an ambit matches everywhere, otherwise
    /// the comparison is case-insensitive.
    pub fn applies_to_ambit(&self, ambit: &str) -> bool {
        match &self.ambit {
            None => true,
            Some(scoped) => scoped.eq_ignore_ascii_case(ambit),
        }
    }
}

fn enabled_by_default() -> bool {
    true
}
