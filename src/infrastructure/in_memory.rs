use crate::domain::ports::{
    ClientDirectory, ClientRecord, ProductCatalog, ProductRecord, ProductTypeRecord,
    TariffRepository, TaxRepository,
};
use crate::domain::rules::{ClientTariffAssignment, Tariff, TariffRule, TaxRule};
use crate::error::LookupResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// An in-memory reference dataset backing all four lookup ports.
///
/// The dataset is loaded once (from a snapshot file or test builders) and
/// only read afterwards, so clones share one `Arc` with no locking. Ideal
/// for batch runs and tests.
#[derive(Default, Clone)]
pub struct InMemoryDataset {
    inner: Arc<Inner>,
}

#[derive(Default, Clone)]
struct Inner {
    clients: HashMap<u32, ClientRecord>,
    shipping_countries: HashMap<u32, String>,
    products: HashMap<u32, ProductRecord>,
    product_types: HashMap<u32, ProductTypeRecord>,
    tariffs: HashMap<u32, Tariff>,
    rules: Vec<TariffRule>,
    assignments: Vec<ClientTariffAssignment>,
    tax_rules: Vec<TaxRule>,
}

impl InMemoryDataset {
    /// Creates a new, empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    fn edit(&mut self) -> &mut Inner {
        Arc::make_mut(&mut self.inner)
    }

    pub fn with_client(mut self, client_id: u32, group_id: Option<u32>) -> Self {
        self.edit().clients.insert(client_id, ClientRecord { group_id });
        self
    }

    pub fn with_shipping_country(mut self, client_id: u32, country: impl Into<String>) -> Self {
        self.edit().shipping_countries.insert(client_id, country.into());
        self
    }

    pub fn with_product(
        mut self,
        product_id: u32,
        family_id: Option<u32>,
        product_type_id: Option<u32>,
        list_price: Decimal,
    ) -> Self {
        self.edit().products.insert(
            product_id,
            ProductRecord {
                family_id,
                product_type_id,
                list_price,
            },
        );
        self
    }

    pub fn with_product_type(mut self, product_type_id: u32, name: impl Into<String>) -> Self {
        self.edit()
            .product_types
            .insert(product_type_id, ProductTypeRecord { name: name.into() });
        self
    }

    pub fn with_tariff(self, tariff_id: u32, name: impl Into<String>, discount_pct: Decimal) -> Self {
        self.with_tariff_row(Tariff {
            id: tariff_id,
            name: name.into(),
            discount_pct,
            enabled: true,
        })
    }

    pub fn with_disabled_tariff(
        self,
        tariff_id: u32,
        name: impl Into<String>,
        discount_pct: Decimal,
    ) -> Self {
        self.with_tariff_row(Tariff {
            id: tariff_id,
            name: name.into(),
            discount_pct,
            enabled: false,
        })
    }

    pub fn with_tariff_row(mut self, tariff: Tariff) -> Self {
        self.edit().tariffs.insert(tariff.id, tariff);
        self
    }

    pub fn with_rule(mut self, rule: TariffRule) -> Self {
        self.edit().rules.push(rule);
        self
    }

    pub fn with_assignment(
        mut self,
        client_id: u32,
        tariff_id: u32,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> Self {
        self.edit().assignments.push(ClientTariffAssignment {
            client_id,
            tariff_id,
            valid_from,
            valid_to,
        });
        self
    }

    pub fn with_tax_rule(mut self, rule: TaxRule) -> Self {
        self.edit().tax_rules.push(rule);
        self
    }
}

#[async_trait]
impl ClientDirectory for InMemoryDataset {
    async fn client(&self, client_id: u32) -> LookupResult<Option<ClientRecord>> {
        Ok(self.inner.clients.get(&client_id).cloned())
    }

    async fn shipping_country(&self, client_id: u32) -> LookupResult<Option<String>> {
        Ok(self.inner.shipping_countries.get(&client_id).cloned())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryDataset {
    async fn product(&self, product_id: u32) -> LookupResult<Option<ProductRecord>> {
        Ok(self.inner.products.get(&product_id).cloned())
    }

    async fn product_type(&self, product_type_id: u32) -> LookupResult<Option<ProductTypeRecord>> {
        Ok(self.inner.product_types.get(&product_type_id).cloned())
    }
}

#[async_trait]
impl TariffRepository for InMemoryDataset {
    async fn enabled_rules(&self) -> LookupResult<Vec<TariffRule>> {
        Ok(self
            .inner
            .rules
            .iter()
            .filter(|rule| rule.enabled)
            .cloned()
            .collect())
    }

    async fn tariff(&self, tariff_id: u32) -> LookupResult<Option<Tariff>> {
        Ok(self.inner.tariffs.get(&tariff_id).cloned())
    }

    async fn assignments_for(&self, client_id: u32) -> LookupResult<Vec<ClientTariffAssignment>> {
        Ok(self
            .inner
            .assignments
            .iter()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaxRepository for InMemoryDataset {
    async fn enabled_rules(&self) -> LookupResult<Vec<TaxRule>> {
        Ok(self
            .inner
            .tax_rules
            .iter()
            .filter(|rule| rule.enabled)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::DEFAULT_RULE_PRIORITY;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_client_lookup() {
        let data = InMemoryDataset::new()
            .with_client(10, Some(2))
            .with_shipping_country(10, "FR");

        let record = data.client(10).await.unwrap().unwrap();
        assert_eq!(record.group_id, Some(2));
        assert_eq!(data.shipping_country(10).await.unwrap().as_deref(), Some("FR"));

        assert!(data.client(11).await.unwrap().is_none());
        assert!(data.shipping_country(11).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let data = InMemoryDataset::new()
            .with_product(204, Some(30), Some(7), dec!(19.99))
            .with_product_type(7, "Hardware");

        let product = data.product(204).await.unwrap().unwrap();
        assert_eq!(product.family_id, Some(30));
        assert_eq!(product.list_price, dec!(19.99));
        assert_eq!(data.product_type(7).await.unwrap().unwrap().name, "Hardware");

        assert!(data.product(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enabled_rules_excludes_disabled() {
        let rule = TariffRule {
            id: 1,
            client_id: Some(10),
            group_id: None,
            product_id: Some(204),
            family_id: None,
            tariff_id: 50,
            valid_from: None,
            valid_to: None,
            priority: DEFAULT_RULE_PRIORITY,
            enabled: true,
        };
        let data = InMemoryDataset::new()
            .with_rule(rule.clone())
            .with_rule(TariffRule {
                id: 2,
                enabled: false,
                ..rule.clone()
            });

        let rules = TariffRepository::enabled_rules(&data).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, 1);
    }

    #[tokio::test]
    async fn test_assignments_are_per_client() {
        let data = InMemoryDataset::new()
            .with_assignment(10, 50, date("2024-01-01"), None)
            .with_assignment(10, 51, date("2024-02-01"), None)
            .with_assignment(11, 52, date("2024-01-01"), None);

        let mine = data.assignments_for(10).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|a| a.client_id == 10));
        assert!(data.assignments_for(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_the_loaded_data() {
        let data = InMemoryDataset::new().with_tariff(50, "Shared", dec!(5.0));
        let other = data.clone();

        let tariff = other.tariff(50).await.unwrap().unwrap();
        assert_eq!(tariff.name, "Shared");
    }
}
