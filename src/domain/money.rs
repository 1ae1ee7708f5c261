use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const HUNDRED: Decimal = dec!(100);

/// Rounds a monetary value to 2 decimal places, half to even, and pins the
/// scale so the value always displays as `x.yy`.
///
/// Every monetary field the engine emits goes through this exact function;
/// callers recomputing a line with a manual discount must use the same chain
/// (`price_parts`) rather than rounding on their own.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}

/// Monetary outputs of one line computation, all rounded to 2 decimals.
///
/// The percentages are echoed back after clamping so the output invariants
/// (`discount_pct` in `[0, 100]`, `tax_pct >= 0`) hold even for
/// caller-supplied overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceParts {
    pub gross_unit: Decimal,
    pub discount_pct: Decimal,
    pub net_unit: Decimal,
    pub subtotal: Decimal,
    pub tax_pct: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Combines gross unit price, discount, quantity and tax rate into the final
/// monetary breakdown of a line.
pub fn price_parts(
    gross_unit: Decimal,
    discount_pct: Decimal,
    quantity: Decimal,
    tax_pct: Decimal,
) -> PriceParts {
    let gross_unit = round2(gross_unit);
    let discount_pct = discount_pct.clamp(Decimal::ZERO, HUNDRED);
    let tax_pct = tax_pct.max(Decimal::ZERO);

    let net_unit = round2(gross_unit * (Decimal::ONE - discount_pct / HUNDRED));
    let subtotal = round2(net_unit * quantity);
    let tax_amount = round2(subtotal * tax_pct / HUNDRED);
    let total = round2(subtotal + tax_amount);

    PriceParts {
        gross_unit,
        discount_pct,
        net_unit,
        subtotal,
        tax_pct,
        tax_amount,
        total,
    }
}
