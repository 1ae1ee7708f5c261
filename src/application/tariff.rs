use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::breakdown::{TariffLevel, TariffMatch};
use crate::domain::ports::TariffRepository;
use crate::domain::rules::TariffRule;

use super::swallow;

/// Scope of a single tariff resolution: who is buying what, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TariffQuery {
    pub client_id: Option<u32>,
    pub group_id: Option<u32>,
    pub product_id: Option<u32>,
    pub family_id: Option<u32>,
    pub as_of: NaiveDate,
}

/// A rule joined with its tariff row, ready for tie-breaking.
#[derive(Debug, Clone)]
struct Candidate {
    rule_id: u32,
    tariff_id: u32,
    tariff_name: String,
    discount_pct: Decimal,
    valid_from: Option<NaiveDate>,
    priority: i32,
}

/// Walks the precedence hierarchy over discount rules.
///
/// Levels are tried strictly in order; the first level with at least one
/// usable candidate wins and lower levels are never consulted, even when
/// they would offer a larger discount.
pub struct TariffResolver<'a> {
    repo: &'a dyn TariffRepository,
}

impl<'a> TariffResolver<'a> {
    const LEVELS: [TariffLevel; 4] = [
        TariffLevel::ProductClient,
        TariffLevel::FamilyClient,
        TariffLevel::ProductGroup,
        TariffLevel::FamilyGroup,
    ];

    pub fn new(repo: &'a dyn TariffRepository) -> Self {
        Self { repo }
    }

    pub async fn resolve(&self, query: &TariffQuery) -> TariffMatch {
        let rules = swallow("tariff-rules", self.repo.enabled_rules().await).unwrap_or_default();

        for level in Self::LEVELS {
            if let Some(found) = self.match_level(level, &rules, query).await {
                return found;
            }
        }

        if let Some(found) = self.match_assignment(query).await {
            return found;
        }

        tracing::debug!(?query, "no tariff rule or assignment matched, using fallback");
        TariffMatch::fallback_general()
    }

    /// Picks the winning rule within one level, or `None` if the level is empty.
    async fn match_level(
        &self,
        level: TariffLevel,
        rules: &[TariffRule],
        query: &TariffQuery,
    ) -> Option<TariffMatch> {
        let mut candidates = Vec::new();
        for rule in rules {
            if !rule.enabled || !rule.active_on(query.as_of) || !level_matches(level, rule, query) {
                continue;
            }
            let Some((name, discount_pct)) = self.usable_tariff(rule.tariff_id).await else {
                continue;
            };
            candidates.push(Candidate {
                rule_id: rule.id,
                tariff_id: rule.tariff_id,
                tariff_name: name,
                discount_pct,
                valid_from: rule.valid_from,
                priority: rule.priority,
            });
        }

        // Largest discount wins; ties go to the most recent start date, then
        // the smallest priority value, then the smallest rule id.
        candidates.sort_by(|a, b| {
            b.discount_pct
                .cmp(&a.discount_pct)
                .then_with(|| b.valid_from.cmp(&a.valid_from))
                .then_with(|| a.priority.cmp(&b.priority))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });

        candidates.into_iter().next().map(|winner| TariffMatch {
            discount_pct: winner.discount_pct,
            tariff_id: winner.tariff_id,
            tariff_name: winner.tariff_name,
            level,
            rule_id: Some(winner.rule_id),
        })
    }

    /// Level 5: direct client-to-tariff assignments, outside the rule table.
    async fn match_assignment(&self, query: &TariffQuery) -> Option<TariffMatch> {
        let client_id = query.client_id?;
        let mut assignments =
            swallow("assignments", self.repo.assignments_for(client_id).await).unwrap_or_default();
        assignments.retain(|a| a.active_on(query.as_of));
        assignments.sort_by(|a, b| {
            a.valid_from
                .cmp(&b.valid_from)
                .then_with(|| a.tariff_id.cmp(&b.tariff_id))
        });

        for assignment in assignments {
            if let Some((name, discount_pct)) = self.usable_tariff(assignment.tariff_id).await {
                return Some(TariffMatch {
                    discount_pct,
                    tariff_id: assignment.tariff_id,
                    tariff_name: name,
                    level: TariffLevel::ClientGeneral,
                    rule_id: None,
                });
            }
        }
        None
    }

    /// Loads the tariff behind a rule or assignment and validates it.
    ///
    /// A missing row, a disabled tariff, or a discount outside [0, 100] all
    /// disqualify the candidate without stopping the resolution.
    async fn usable_tariff(&self, tariff_id: u32) -> Option<(String, Decimal)> {
        let tariff = match swallow("tariff", self.repo.tariff(tariff_id).await) {
            Some(Some(tariff)) => tariff,
            Some(None) => {
                tracing::warn!(tariff_id, "rule references a tariff that does not exist");
                return None;
            }
            None => return None,
        };
        if !tariff.enabled {
            return None;
        }
        if tariff.discount_pct < Decimal::ZERO || tariff.discount_pct > dec!(100) {
            tracing::warn!(
                tariff_id,
                discount_pct = %tariff.discount_pct,
                "tariff discount outside 0..=100, skipping"
            );
            return None;
        }
        Some((tariff.name, tariff.discount_pct))
    }
}

/// Both sides must be present and equal for a scope field to match.
///
/// A rule that leaves a field empty is a broader rule, not a wildcard: it
/// belongs to a lower level and never matches here.
fn scope_eq(rule_scope: Option<u32>, queried: Option<u32>) -> bool {
    matches!((rule_scope, queried), (Some(a), Some(b)) if a == b)
}

fn level_matches(level: TariffLevel, rule: &TariffRule, query: &TariffQuery) -> bool {
    match level {
        TariffLevel::ProductClient => {
            scope_eq(rule.product_id, query.product_id) && scope_eq(rule.client_id, query.client_id)
        }
        TariffLevel::FamilyClient => {
            scope_eq(rule.family_id, query.family_id) && scope_eq(rule.client_id, query.client_id)
        }
        TariffLevel::ProductGroup => {
            scope_eq(rule.product_id, query.product_id) && scope_eq(rule.group_id, query.group_id)
        }
        TariffLevel::FamilyGroup => {
            scope_eq(rule.family_id, query.family_id) && scope_eq(rule.group_id, query.group_id)
        }
        TariffLevel::ClientGeneral | TariffLevel::FallbackGeneral => false,
    }
}
