use thiserror::Error;

pub type Result<T> = std::result::Result<T, PricingError>;

/// Result of a single repository lookup. The resolvers never propagate these;
/// every `Err` is swallowed into "no match at this step" (and logged).
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Why a repository lookup produced nothing usable.
///
/// `Unavailable` covers backing-store failures, `Malformed` covers rule rows
/// that decode but carry an invalid window or percentage. Both degrade to
/// defaults inside the resolvers; neither ever escapes `resolve_price`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("data unavailable: {0}")]
    Unavailable(String),
    #[error("malformed rule data: {0}")]
    Malformed(String),
}

/// Errors of the outer layers (CSV/JSON interfaces and the CLI). The engine
/// itself never returns these.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("snapshot error: {0}")]
    SnapshotError(#[from] serde_json::Error),
}
