//! Application layer: context loading, tariff and tax resolution, and the
//! orchestrating `PricingEngine`.
//!
//! Everything in here is best-effort by contract: a failed lookup is
//! equivalent to "no data at this step" and resolution carries on with the
//! next precedence level or the documented default.

pub mod context;
pub mod engine;
pub mod tariff;
pub mod tax;

use crate::error::LookupResult;

/// Collapses a failed lookup into `None`, emitting the warning that keeps
/// "query failed" distinguishable from "legitimately no match" in logs.
/// This is the single place where the engine swallows an error.
pub(crate) fn swallow<T>(step: &'static str, result: LookupResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(step, %error, "lookup failed, treated as no match");
            None
        }
    }
}
