use async_trait::async_trait;
use rust_decimal::Decimal;

use super::rules::{ClientTariffAssignment, Tariff, TariffRule, TaxRule};
use crate::error::LookupResult;

/// Client master data the engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    pub group_id: Option<u32>,
}

/// Product master data the engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub family_id: Option<u32>,
    pub product_type_id: Option<u32>,
    pub list_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductTypeRecord {
    pub name: String,
}

#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn client(&self, client_id: u32) -> LookupResult<Option<ClientRecord>>;
    /// Country code of the client's shipping address, if any.
    async fn shipping_country(&self, client_id: u32) -> LookupResult<Option<String>>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, product_id: u32) -> LookupResult<Option<ProductRecord>>;
    async fn product_type(&self, product_type_id: u32) -> LookupResult<Option<ProductTypeRecord>>;
}

#[async_trait]
pub trait TariffRepository: Send + Sync {
    /// Every enabled tariff rule in the current snapshot.
    async fn enabled_rules(&self) -> LookupResult<Vec<TariffRule>>;
    async fn tariff(&self, tariff_id: u32) -> LookupResult<Option<Tariff>>;
    /// Client-level fallback assignments for one client.
    async fn assignments_for(&self, client_id: u32) -> LookupResult<Vec<ClientTariffAssignment>>;
}

#[async_trait]
pub trait TaxRepository: Send + Sync {
    /// Every enabled tax rule in the current snapshot.
    async fn enabled_rules(&self) -> LookupResult<Vec<TaxRule>>;
}

pub type ClientDirectoryBox = Box<dyn ClientDirectory>;
pub type ProductCatalogBox = Box<dyn ProductCatalog>;
pub type TariffRepositoryBox = Box<dyn TariffRepository>;
pub type TaxRepositoryBox = Box<dyn TaxRepository>;
