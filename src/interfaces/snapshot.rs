use crate::domain::rules::{
    ClientTariffAssignment, DEFAULT_RULE_PRIORITY, Tariff, TariffRule, TaxRule,
};
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryDataset;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A JSON serialization of the external rule tables, loaded once per batch.
///
/// Every section is optional; a missing section is an empty table. Legacy
/// encodings (aliased product columns, `0` for "no group") are mapped here,
/// at the boundary, so everything past this file sees normalized rows.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuleSnapshot {
    pub clients: Vec<ClientEntry>,
    pub products: Vec<ProductEntry>,
    pub product_types: Vec<ProductTypeEntry>,
    pub tariffs: Vec<Tariff>,
    pub rules: Vec<TariffRuleRecord>,
    pub assignments: Vec<ClientTariffAssignment>,
    pub tax_rules: Vec<TaxRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientEntry {
    pub id: u32,
    #[serde(default)]
    pub group_id: Option<u32>,
    #[serde(default)]
    pub shipping_country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    pub id: u32,
    #[serde(default)]
    pub family_id: Option<u32>,
    #[serde(default)]
    pub product_type_id: Option<u32>,
    #[serde(default)]
    pub list_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductTypeEntry {
    pub id: u32,
    pub name: String,
}

/// A raw rule row as the legacy schema stores it, before normalization.
///
/// The schema accumulated three product columns over the years; `product_id`
/// is the current one, `product_ref` and `legacy_article_id` survive from
/// earlier migrations and may still be the only one populated.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffRuleRecord {
    pub id: u32,
    #[serde(default)]
    pub client_id: Option<u32>,
    #[serde(default)]
    pub group_id: Option<u32>,
    #[serde(default)]
    pub product_id: Option<u32>,
    #[serde(default)]
    pub product_ref: Option<u32>,
    #[serde(default)]
    pub legacy_article_id: Option<u32>,
    #[serde(default)]
    pub family_id: Option<u32>,
    pub tariff_id: u32,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl TariffRuleRecord {
    /// Folds the aliased product columns into one id: first populated column
    /// wins, in declaration order. Disagreeing aliases are logged.
    fn canonical_product_id(&self) -> Option<u32> {
        let aliases = [self.product_id, self.product_ref, self.legacy_article_id];
        let mut populated = aliases.iter().flatten();
        let first = *populated.next()?;
        if populated.any(|&other| other != first) {
            tracing::warn!(
                rule_id = self.id,
                product_id = first,
                "product alias columns disagree, keeping the first populated one"
            );
        }
        Some(first)
    }

    pub fn into_rule(self) -> TariffRule {
        TariffRule {
            id: self.id,
            client_id: self.client_id,
            group_id: group_from_legacy(self.group_id),
            product_id: self.canonical_product_id(),
            family_id: self.family_id,
            tariff_id: self.tariff_id,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            priority: self.priority,
            enabled: self.enabled,
        }
    }
}

/// The legacy schema stores "no group" as group `0`.
fn group_from_legacy(group_id: Option<u32>) -> Option<u32> {
    group_id.filter(|&id| id != 0)
}

fn default_priority() -> i32 {
    DEFAULT_RULE_PRIORITY
}

fn default_true() -> bool {
    true
}

impl RuleSnapshot {
    pub fn from_reader(source: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Normalizes the snapshot into the dataset backing all four ports.
    pub fn into_dataset(self) -> InMemoryDataset {
        let mut data = InMemoryDataset::new();
        for client in self.clients {
            data = data.with_client(client.id, group_from_legacy(client.group_id));
            if let Some(country) = client.shipping_country {
                data = data.with_shipping_country(client.id, country);
            }
        }
        for product in self.products {
            data = data.with_product(
                product.id,
                product.family_id,
                product.product_type_id,
                product.list_price,
            );
        }
        for product_type in self.product_types {
            data = data.with_product_type(product_type.id, product_type.name);
        }
        for tariff in self.tariffs {
            data = data.with_tariff_row(tariff);
        }
        for record in self.rules {
            data = data.with_rule(record.into_rule());
        }
        for assignment in self.assignments {
            data = data.with_assignment(
                assignment.client_id,
                assignment.tariff_id,
                assignment.valid_from,
                assignment.valid_to,
            );
        }
        for rule in self.tax_rules {
            data = data.with_tax_rule(rule);
        }
        data
    }
}
