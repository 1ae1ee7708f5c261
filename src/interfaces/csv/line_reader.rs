use crate::application::engine::PriceRequest;
use crate::error::{PricingError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One CSV input row. All columns are optional so that ad-hoc lines with only
/// a manual price, or only a product, still parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceLine {
    #[serde(default)]
    pub client_id: Option<u32>,
    #[serde(default)]
    pub product_id: Option<u32>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
}

impl PriceLine {
    /// Completes the row into an engine request for the given effective date.
    pub fn into_request(self, as_of: NaiveDate) -> PriceRequest {
        PriceRequest {
            client_id: self.client_id,
            product_id: self.product_id,
            unit_price: self.unit_price,
            quantity: self.quantity.unwrap_or(Decimal::ONE),
            as_of,
        }
    }
}

/// Reads price lines from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<PriceLine>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct LineReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> LineReader<R> {
    /// Creates a new `LineReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes lines.
    ///
    /// A malformed row yields an `Err` for that row only; the iterator keeps
    /// going, so one bad line never aborts a batch.
    pub fn lines(self) -> impl Iterator<Item = Result<PriceLine>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PricingError::from))
    }
}
