use rust_decimal::Decimal;
use serde::Serialize;

/// Jurisdiction used when a client has no shipping country on file.
pub const DEFAULT_AMBIT: &str = "ES";

/// Where a resolved ambit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbitOrigin {
    ShippingAddress,
}

/// Client-side inputs to one resolution, derived per call from the client
/// record and its shipping address. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientContext {
    pub group_id: Option<u32>,
    pub ambit: String,
    pub ambit_origin: Option<AmbitOrigin>,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            group_id: None,
            ambit: DEFAULT_AMBIT.to_string(),
            ambit_origin: None,
        }
    }
}

/// Product-side inputs to one resolution, derived per call from the catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductContext {
    pub family_id: Option<u32>,
    pub product_type_id: Option<u32>,
    pub product_type_name: Option<String>,
    /// Generic list price, used as the gross unit price unless the caller
    /// supplies an override.
    pub generic_price: Decimal,
}
