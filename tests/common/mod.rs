use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tarifa::application::engine::PricingEngine;
use tarifa::domain::ports::{
    ClientDirectory, ClientRecord, ProductCatalog, ProductRecord, ProductTypeRecord,
    TariffRepository, TaxRepository,
};
use tarifa::domain::rules::{
    ClientTariffAssignment, DEFAULT_RULE_PRIORITY, Tariff, TariffRule, TaxRule,
};
use tarifa::error::{LookupError, LookupResult};
use tarifa::infrastructure::in_memory::InMemoryDataset;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Wires one shared dataset into all four engine ports.
pub fn engine(data: InMemoryDataset) -> PricingEngine {
    PricingEngine::new(
        Box::new(data.clone()),
        Box::new(data.clone()),
        Box::new(data.clone()),
        Box::new(data),
    )
}

/// A rule with no scope fields set; tests fill in the relevant ones.
pub fn rule(id: u32, tariff_id: u32) -> TariffRule {
    TariffRule {
        id,
        client_id: None,
        group_id: None,
        product_id: None,
        family_id: None,
        tariff_id,
        valid_from: None,
        valid_to: None,
        priority: DEFAULT_RULE_PRIORITY,
        enabled: true,
    }
}

/// An ambit-general Spanish tax rule.
pub fn tax_rule(id: u32, name: &str, rate_pct: Decimal) -> TaxRule {
    TaxRule {
        id,
        name: name.into(),
        rate_pct,
        ambit: Some("ES".into()),
        product_type_id: None,
        enabled: true,
        valid_from: None,
        valid_to: None,
    }
}

/// A store where every lookup fails, for the no-throw contract.
pub struct FailingStore;

#[async_trait]
impl ClientDirectory for FailingStore {
    async fn client(&self, _client_id: u32) -> LookupResult<Option<ClientRecord>> {
        Err(LookupError::Unavailable("client directory offline".into()))
    }

    async fn shipping_country(&self, _client_id: u32) -> LookupResult<Option<String>> {
        Err(LookupError::Unavailable("client directory offline".into()))
    }
}

#[async_trait]
impl ProductCatalog for FailingStore {
    async fn product(&self, _product_id: u32) -> LookupResult<Option<ProductRecord>> {
        Err(LookupError::Unavailable("catalog offline".into()))
    }

    async fn product_type(&self, _product_type_id: u32) -> LookupResult<Option<ProductTypeRecord>> {
        Err(LookupError::Unavailable("catalog offline".into()))
    }
}

#[async_trait]
impl TariffRepository for FailingStore {
    async fn enabled_rules(&self) -> LookupResult<Vec<TariffRule>> {
        Err(LookupError::Unavailable("rule store offline".into()))
    }

    async fn tariff(&self, _tariff_id: u32) -> LookupResult<Option<Tariff>> {
        Err(LookupError::Malformed("tariff row does not decode".into()))
    }

    async fn assignments_for(&self, _client_id: u32) -> LookupResult<Vec<ClientTariffAssignment>> {
        Err(LookupError::Unavailable("rule store offline".into()))
    }
}

#[async_trait]
impl TaxRepository for FailingStore {
    async fn enabled_rules(&self) -> LookupResult<Vec<TaxRule>> {
        Err(LookupError::Unavailable("tax store offline".into()))
    }
}

/// An engine whose every port fails.
pub fn failing_engine() -> PricingEngine {
    PricingEngine::new(
        Box::new(FailingStore),
        Box::new(FailingStore),
        Box::new(FailingStore),
        Box::new(FailingStore),
    )
}

/// A seeded pseudo-random snapshot: 10 clients, products 200..=210, 20
/// tariffs and a pile of partially-scoped rules. Same seed, same JSON.
pub fn generate_snapshot_json(seed: u64, rule_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(seed);

    let countries = ["ES", "FR", "PT"];
    let mut clients = Vec::new();
    for id in 1..=10u32 {
        let mut client = serde_json::json!({ "id": id });
        // group 0 exercises the legacy "no group" mapping
        if rng.gen_bool(0.7) {
            client["group_id"] = rng.gen_range(0..=3u32).into();
        }
        if rng.gen_bool(0.5) {
            client["shipping_country"] = countries[rng.gen_range(0..countries.len())].into();
        }
        clients.push(client);
    }

    let mut products = Vec::new();
    for id in 200..=210u32 {
        products.push(serde_json::json!({
            "id": id,
            "family_id": rng.gen_range(30..=33u32),
            "product_type_id": rng.gen_range(1..=3u32),
            "list_price": format!("{}.{:02}", rng.gen_range(1..200u32), rng.gen_range(0..100u32)),
        }));
    }

    let product_types = (1..=3u32)
        .map(|id| serde_json::json!({ "id": id, "name": format!("Type {id}") }))
        .collect::<Vec<_>>();

    let mut tariffs = Vec::new();
    for id in 11..=30u32 {
        tariffs.push(serde_json::json!({
            "id": id,
            "name": format!("Tariff {id}"),
            "discount_pct": format!("{}.{}", rng.gen_range(0..30u32), rng.gen_range(0..10u32)),
            "enabled": rng.gen_bool(0.9),
        }));
    }

    let mut rules = Vec::new();
    for id in 1..=rule_count as u32 {
        let mut rule = serde_json::json!({
            "id": id,
            "tariff_id": rng.gen_range(11..=30u32),
        });
        if rng.gen_bool(0.6) {
            rule["client_id"] = rng.gen_range(1..=10u32).into();
        }
        if rng.gen_bool(0.4) {
            rule["group_id"] = rng.gen_range(0..=3u32).into();
        }
        if rng.gen_bool(0.6) {
            // alternate between the current and the legacy product columns
            let product = rng.gen_range(200..=210u32);
            match rng.gen_range(0..3u32) {
                0 => rule["product_id"] = product.into(),
                1 => rule["product_ref"] = product.into(),
                _ => rule["legacy_article_id"] = product.into(),
            }
        }
        if rng.gen_bool(0.4) {
            rule["family_id"] = rng.gen_range(30..=33u32).into();
        }
        if rng.gen_bool(0.3) {
            rule["valid_from"] = format!(
                "2024-{:02}-{:02}",
                rng.gen_range(1..=12u32),
                rng.gen_range(1..=28u32)
            )
            .into();
        }
        if rng.gen_bool(0.2) {
            rule["priority"] = rng.gen_range(1..=10i32).into();
        }
        rules.push(rule);
    }

    let mut assignments = Vec::new();
    for client_id in 1..=10u32 {
        if rng.gen_bool(0.3) {
            assignments.push(serde_json::json!({
                "client_id": client_id,
                "tariff_id": rng.gen_range(11..=30u32),
                "valid_from": "2024-01-01",
            }));
        }
    }

    let mut tax_rules = vec![
        serde_json::json!({ "id": 1, "name": "Standard VAT", "rate_pct": "21.0", "ambit": "ES" }),
        serde_json::json!({ "id": 2, "name": "French VAT", "rate_pct": "20.0", "ambit": "FR" }),
    ];
    for id in 3..=6u32 {
        tax_rules.push(serde_json::json!({
            "id": id,
            "name": format!("Reduced {id}"),
            "rate_pct": format!("{}.0", rng.gen_range(4..=10u32)),
            "ambit": countries[rng.gen_range(0..countries.len())],
            "product_type_id": rng.gen_range(1..=3u32),
        }));
    }

    serde_json::json!({
        "clients": clients,
        "products": products,
        "product_types": product_types,
        "tariffs": tariffs,
        "rules": rules,
        "assignments": assignments,
        "tax_rules": tax_rules,
    })
    .to_string()
}
