use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::breakdown::{TaxMatch, TaxOrigin};
use crate::domain::ports::TaxRepository;
use crate::domain::rules::TaxRule;

use super::swallow;

/// Scope of a tax lookup: the product's type, the territorial ambit, and the
/// effective date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxQuery {
    pub product_type_id: Option<u32>,
    pub ambit: String,
    pub as_of: NaiveDate,
}

/// Resolves the applicable tax rate.
///
/// Type-specific rules take precedence over ambit-wide ones; when neither
/// exists the match is `Unknown` with a zero rate, never an error.
pub struct TaxResolver<'a> {
    repo: &'a dyn TaxRepository,
}

impl<'a> TaxResolver<'a> {
    pub fn new(repo: &'a dyn TaxRepository) -> Self {
        Self { repo }
    }

    pub async fn resolve(&self, query: &TaxQuery) -> TaxMatch {
        let Some(rules) = swallow("tax-rules", self.repo.enabled_rules().await) else {
            return TaxMatch::unknown();
        };

        let applicable: Vec<&TaxRule> = rules
            .iter()
            .filter(|rule| rule.enabled && rule.active_on(query.as_of))
            .filter(|rule| query.ambit.is_empty() || rule.applies_to_ambit(&query.ambit))
            .filter(|rule| {
                if rule.rate_pct < Decimal::ZERO {
                    tracing::warn!(rule_id = rule.id, rate_pct = %rule.rate_pct, "negative tax rate, skipping");
                    return false;
                }
                true
            })
            .collect();

        if let Some(type_id) = query.product_type_id
            && let Some(rule) = pick_latest(
                applicable
                    .iter()
                    .copied()
                    .filter(|rule| rule.product_type_id == Some(type_id)),
            )
        {
            return matched(rule, TaxOrigin::ProductType);
        }

        if let Some(rule) = pick_latest(
            applicable
                .iter()
                .copied()
                .filter(|rule| rule.product_type_id.is_none()),
        ) {
            return matched(rule, TaxOrigin::AmbitGeneral);
        }

        tracing::debug!(?query, "no tax rule matched");
        TaxMatch::unknown()
    }
}

/// Most recent start date wins; an open start counts as the oldest. Equal
/// dates fall back to the lowest rule id.
fn pick_latest<'r>(rules: impl Iterator<Item = &'r TaxRule>) -> Option<&'r TaxRule> {
    rules.max_by(|a, b| {
        a.valid_from
            .cmp(&b.valid_from)
            .then_with(|| b.id.cmp(&a.id))
    })
}

fn matched(rule: &TaxRule, origin: TaxOrigin) -> TaxMatch {
    TaxMatch {
        rate_pct: rule.rate_pct,
        name: Some(rule.name.clone()),
        origin,
    }
}
