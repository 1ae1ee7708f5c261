use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::application::context::ContextLoader;
use crate::application::tariff::{TariffQuery, TariffResolver};
use crate::application::tax::{TaxQuery, TaxResolver};
use crate::domain::breakdown::PriceBreakdown;
use crate::domain::money::price_parts;
use crate::domain::ports::{
    ClientDirectoryBox, ProductCatalogBox, TariffRepositoryBox, TaxRepositoryBox,
};

/// One price line to resolve.
///
/// Every field except `quantity` and `as_of` may be absent: a bare request
/// still resolves, it just lands on the fallback tariff and a zero price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub client_id: Option<u32>,
    pub product_id: Option<u32>,
    /// Overrides the catalog list price when present (manual lines).
    pub unit_price: Option<Decimal>,
    pub quantity: Decimal,
    pub as_of: NaiveDate,
}

impl PriceRequest {
    /// A single unit, priced as of today.
    pub fn new(client_id: Option<u32>, product_id: Option<u32>) -> Self {
        Self {
            client_id,
            product_id,
            unit_price: None,
            quantity: Decimal::ONE,
            as_of: Utc::now().date_naive(),
        }
    }
}

/// The main entry point for price resolution.
///
/// `PricingEngine` owns the four lookup ports and drives one request through
/// context loading, tariff resolution, tax resolution, and the monetary
/// breakdown. Lookups run sequentially; the engine holds no mutable state,
/// so callers may share it across tasks freely.
pub struct PricingEngine {
    clients: ClientDirectoryBox,
    catalog: ProductCatalogBox,
    tariffs: TariffRepositoryBox,
    taxes: TaxRepositoryBox,
}

impl PricingEngine {
    /// Creates a new `PricingEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `clients` - The directory of clients and their shipping countries.
    /// * `catalog` - The product and product-type catalog.
    /// * `tariffs` - The store of discount rules, tariffs, and assignments.
    /// * `taxes` - The store of tax rules.
    pub fn new(
        clients: ClientDirectoryBox,
        catalog: ProductCatalogBox,
        tariffs: TariffRepositoryBox,
        taxes: TaxRepositoryBox,
    ) -> Self {
        Self {
            clients,
            catalog,
            tariffs,
            taxes,
        }
    }

    /// Resolves one request into a complete breakdown.
    ///
    /// This never fails: lookup errors degrade the result toward the general
    /// tariff and an unknown tax, and the arithmetic is total.
    pub async fn resolve_price(&self, request: &PriceRequest) -> PriceBreakdown {
        let loader = ContextLoader::new(self.clients.as_ref(), self.catalog.as_ref());
        let client_ctx = loader.load_client_context(request.client_id).await;
        let product_ctx = loader.load_product_context(request.product_id).await;

        let tariff = TariffResolver::new(self.tariffs.as_ref())
            .resolve(&TariffQuery {
                client_id: request.client_id,
                group_id: client_ctx.group_id,
                product_id: request.product_id,
                family_id: product_ctx.family_id,
                as_of: request.as_of,
            })
            .await;

        let tax = TaxResolver::new(self.taxes.as_ref())
            .resolve(&TaxQuery {
                product_type_id: product_ctx.product_type_id,
                ambit: client_ctx.ambit.clone(),
                as_of: request.as_of,
            })
            .await;

        let gross_unit = request.unit_price.unwrap_or(product_ctx.generic_price);
        let parts = price_parts(gross_unit, tariff.discount_pct, request.quantity, tax.rate_pct);

        tracing::debug!(
            client_id = ?request.client_id,
            product_id = ?request.product_id,
            level = ?tariff.level,
            discount_pct = %parts.discount_pct,
            tax_pct = %parts.tax_pct,
            total = %parts.total,
            "price resolved"
        );

        PriceBreakdown {
            gross_unit: parts.gross_unit,
            discount_pct: parts.discount_pct,
            net_unit_ex_tax: parts.net_unit,
            subtotal_ex_tax: parts.subtotal,
            tax_pct: parts.tax_pct,
            tax_amount: parts.tax_amount,
            total_inc_tax: parts.total,
            tariff_id: Some(tariff.tariff_id),
            tariff_name: Some(tariff.tariff_name),
            tariff_level: tariff.level,
            rule_id: tariff.rule_id,
            tax_name: tax.name,
            tax_origin: tax.origin,
            ambit: client_ctx.ambit,
            ambit_origin: client_ctx.ambit_origin,
        }
    }
}
