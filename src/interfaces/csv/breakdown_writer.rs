use crate::domain::breakdown::PriceBreakdown;
use crate::error::Result;
use std::io::Write;

/// Writes resolved breakdowns as CSV.
///
/// Headers come from the breakdown's field names and are emitted once, on
/// the first row. Rows are written as they are resolved so large batches
/// stream without buffering.
pub struct BreakdownWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BreakdownWriter<W> {
    /// Creates a new `BreakdownWriter` over any `Write` target (e.g., File, Stdout).
    pub fn new(target: W) -> Self {
        let writer = csv::WriterBuilder::new().from_writer(target);
        Self { writer }
    }

    pub fn write_breakdown(&mut self, breakdown: &PriceBreakdown) -> Result<()> {
        self.writer.serialize(breakdown)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::breakdown::{TariffLevel, TaxOrigin};
    use rust_decimal_macros::dec;

    fn sample() -> PriceBreakdown {
        PriceBreakdown {
            gross_unit: dec!(19.99),
            discount_pct: dec!(10.0),
            net_unit_ex_tax: dec!(17.99),
            subtotal_ex_tax: dec!(53.97),
            tax_pct: dec!(21.0),
            tax_amount: dec!(11.33),
            total_inc_tax: dec!(65.30),
            tariff_id: Some(50),
            tariff_name: Some("Spring promo".into()),
            tariff_level: TariffLevel::ProductClient,
            rule_id: Some(1),
            tax_name: Some("Standard VAT".into()),
            tax_origin: TaxOrigin::AmbitGeneral,
            ambit: "ES".into(),
            ambit_origin: None,
        }
    }

    #[test]
    fn test_writer_emits_headers_and_rows() {
        let mut buffer = Vec::new();
        {
            let mut writer = BreakdownWriter::new(&mut buffer);
            writer.write_breakdown(&sample()).unwrap();
            writer.write_breakdown(&sample()).unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("grossUnit,discountPct,netUnitExTax,subtotalExTax"));
        assert!(header.contains("tariffLevel"));

        let row = lines.next().unwrap();
        assert!(row.contains("65.30"));
        assert!(row.contains("productClient"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_absent_fields_serialize_as_empty() {
        let breakdown = PriceBreakdown {
            tariff_id: None,
            tariff_name: None,
            rule_id: None,
            tax_name: None,
            ..sample()
        };

        let mut buffer = Vec::new();
        {
            let mut writer = BreakdownWriter::new(&mut buffer);
            writer.write_breakdown(&breakdown).unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let row = output.lines().nth(1).unwrap();
        assert!(row.contains(",,"));
    }
}
