use crate::domain::context::{AmbitOrigin, ClientContext, ProductContext};
use crate::domain::ports::{ClientDirectory, ProductCatalog};

use super::swallow;

/// Builds the per-call client and product contexts.
///
/// Both loaders accept an absent id (ad-hoc manual lines) and must not fail
/// the overall resolution: a store error or a missing row collapses to the
/// all-default context.
pub struct ContextLoader<'a> {
    clients: &'a dyn ClientDirectory,
    catalog: &'a dyn ProductCatalog,
}

impl<'a> ContextLoader<'a> {
    pub fn new(clients: &'a dyn ClientDirectory, catalog: &'a dyn ProductCatalog) -> Self {
        Self { clients, catalog }
    }

    pub async fn load_client_context(&self, client_id: Option<u32>) -> ClientContext {
        let mut ctx = ClientContext::default();
        let Some(client_id) = client_id else {
            return ctx;
        };

        if let Some(Some(record)) = swallow("client", self.clients.client(client_id).await) {
            ctx.group_id = record.group_id;
        }

        if let Some(Some(country)) = swallow(
            "shipping-country",
            self.clients.shipping_country(client_id).await,
        ) && !country.is_empty()
        {
            ctx.ambit = country;
            ctx.ambit_origin = Some(AmbitOrigin::ShippingAddress);
        }

        ctx
    }

    pub async fn load_product_context(&self, product_id: Option<u32>) -> ProductContext {
        let mut ctx = ProductContext::default();
        let Some(product_id) = product_id else {
            return ctx;
        };

        if let Some(Some(product)) = swallow("product", self.catalog.product(product_id).await) {
            ctx.family_id = product.family_id;
            ctx.product_type_id = product.product_type_id;
            ctx.generic_price = product.list_price;
        }

        if let Some(type_id) = ctx.product_type_id
            && let Some(Some(product_type)) =
                swallow("product-type", self.catalog.product_type(type_id).await)
        {
            ctx.product_type_name = Some(product_type.name);
        }

        ctx
    }
}
